use std::{net::SocketAddr, sync::Arc, time::Duration};

use {
    aidraw_config::BackendConfig,
    anyhow::Context,
    axum::{
        Router,
        routing::{get, post},
    },
    tokio::net::TcpListener,
    tracing::info,
};

use crate::{
    download::ImageFetcher,
    routes::{health, process_image},
};

/// Shared handler state.
pub struct BackendState {
    pub fetcher: ImageFetcher,
    /// Client for Gemini calls, with the generation timeout applied.
    pub generation_http: reqwest::Client,
    pub defaults: BackendConfig,
}

impl BackendState {
    pub fn new(config: BackendConfig) -> anyhow::Result<Self> {
        let download_http = reqwest::Client::builder()
            .build()
            .context("building download HTTP client")?;
        let generation_http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.generation_timeout_secs))
            .build()
            .context("building generation HTTP client")?;
        Ok(Self {
            fetcher: ImageFetcher::new(
                download_http,
                Duration::from_secs(config.download_timeout_secs),
            ),
            generation_http,
            defaults: config,
        })
    }
}

/// Build the service router (shared between startup and tests).
pub fn build_app(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/process-image", post(process_image))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: BackendConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    let local: SocketAddr = listener.local_addr()?;

    info!(addr = %local, "image proxy listening");
    info!("health check: http://{local}/health");
    info!("process endpoint: http://{local}/process-image");

    let app = build_app(Arc::new(BackendState::new(config)?));
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down image proxy");
        })
        .await
        .context("image proxy server failed")
}
