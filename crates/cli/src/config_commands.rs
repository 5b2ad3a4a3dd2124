use std::path::{Path, PathBuf};

use {
    aidraw_config::{AidrawConfig, Severity, validate},
    anyhow::{Context, Result},
    clap::Subcommand,
    secrecy::Secret,
};

use crate::load_config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a documented default config file.
    Init {
        /// Destination (defaults to ~/.config/aidraw/aidraw.toml).
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Validate the configuration file and report errors/warnings.
    Check {
        /// Show informational diagnostics in addition to errors and warnings.
        #[arg(long)]
        verbose: bool,
    },
    /// Print the effective configuration (file + environment), key redacted.
    Show,
}

pub fn handle_config(action: ConfigAction, config_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Init { path } => init(path),
        ConfigAction::Check { verbose } => check(config_path, verbose),
        ConfigAction::Show => show(config_path),
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn init(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => aidraw_config::config_dir()
            .context("cannot determine the user config directory; pass --path")?
            .join("aidraw.toml"),
    };
    aidraw_config::write_default_config(&path)?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

fn check(config_path: Option<&Path>, verbose: bool) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .or_else(aidraw_config::find_config_file);
    let config = load_config(path.as_deref())?;

    let mut result = validate(&config);
    result.config_path = path;

    // Print which file we're checking
    if let Some(ref path) = result.config_path {
        eprintln!("Checking {}\n", path.display());
    } else {
        eprintln!("No config file found; checking defaults.\n");
    }

    let mut shown = 0;
    for d in &result.diagnostics {
        if d.severity == Severity::Info && !verbose {
            continue;
        }

        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
            Severity::Info => CYAN,
        };
        eprintln!("  {BOLD}{color}{}{RESET} {}: {}", d.severity, d.path, d.message);
        shown += 1;
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);

    if shown > 0 {
        eprintln!();
    }

    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Effective config as TOML with the API key masked.
fn render_redacted(mut config: AidrawConfig) -> Result<String> {
    if config.drawing.api_key().is_some() {
        config.drawing.api_key = Some(Secret::new("********".into()));
    }
    toml::to_string_pretty(&config).context("serializing config")
}

fn show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", render_redacted(config)?);
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_never_prints_the_key() {
        let mut config = AidrawConfig::default();
        config.drawing.api_key = Some(Secret::new("sk-very-secret".into()));

        let rendered = render_redacted(config).unwrap();

        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("api_key = \"********\""));
        assert!(rendered.contains("[backend]"));
    }

    #[test]
    fn init_writes_a_loadable_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/aidraw.toml");

        init(Some(path.clone())).unwrap();

        let config = aidraw_config::load_config(&path).unwrap();
        assert_eq!(config.backend.port, aidraw_config::schema::DEFAULT_BACKEND_PORT);
        assert!(init(Some(path)).is_err());
    }
}
