mod chat_commands;
mod config_commands;

use std::path::{Path, PathBuf};

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "aidraw", about = "aidraw: chat-driven AI drawing with Gemini")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery of ./aidraw.toml and ~/.config/aidraw/).
    #[arg(long, global = true, env = "AIDRAW_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read chat messages from stdin and answer them (default).
    Chat,
    /// Handle a single chat message and exit.
    Send {
        #[arg(short, long)]
        message: String,
    },
    /// Run the image proxy service.
    Backend {
        /// Address to bind to (overrides config value).
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides config value).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so chat replies on stdout stay clean.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Load the config file named on the command line, or discover one, then
/// apply environment overrides.
fn load_config(path: Option<&Path>) -> anyhow::Result<aidraw_config::AidrawConfig> {
    let config = match path {
        Some(path) => aidraw_config::load_config(path)?,
        None => aidraw_config::discover_and_load(),
    };
    Ok(aidraw_config::apply_env_overrides(config))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "aidraw starting");

    match cli.command {
        None | Some(Commands::Chat) => chat_commands::run_chat(cli.config).await,
        Some(Commands::Send { message }) => {
            let outcome = chat_commands::send_once(cli.config, &message).await?;
            if !outcome.is_success() {
                std::process::exit(1);
            }
            Ok(())
        },
        Some(Commands::Backend { bind, port }) => {
            let mut backend = load_config(cli.config.as_deref())?.backend;
            if let Some(bind) = bind {
                backend.bind = bind;
            }
            if let Some(port) = port {
                backend.port = port;
            }
            aidraw_backend::serve(backend).await
        },
        Some(Commands::Config { action }) => {
            config_commands::handle_config(action, cli.config.as_deref())
        },
    }
}
