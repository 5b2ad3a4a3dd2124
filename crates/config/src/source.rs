//! Per-invocation configuration snapshots.
//!
//! The drawing command asks its [`ConfigSource`] for a fresh
//! [`DrawingConfig`] every time it runs, so an operator editing the config
//! file between messages sees the change on the next message.

use std::path::PathBuf;

use {async_trait::async_trait, tracing::warn};

use crate::{
    loader::{apply_env_overrides, discover_and_load, load_or_default},
    schema::DrawingConfig,
};

/// Supplies an immutable drawing config snapshot per call.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn drawing(&self) -> DrawingConfig;
}

/// Re-reads the config file (and environment overrides) on every call.
#[derive(Debug, Clone, Default)]
pub struct FileConfigSource {
    path: Option<PathBuf>,
}

impl FileConfigSource {
    /// Read `path` on every call.
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Re-run discovery on every call.
    pub fn discover() -> Self {
        Self::default()
    }
}

impl FileConfigSource {
    fn load(&self) -> DrawingConfig {
        let config = match &self.path {
            Some(path) => load_or_default(path),
            None => discover_and_load(),
        };
        apply_env_overrides(config).drawing
    }
}

#[async_trait]
impl ConfigSource for FileConfigSource {
    /// File reads run on the blocking pool.
    async fn drawing(&self) -> DrawingConfig {
        let source = self.clone();
        match tokio::task::spawn_blocking(move || source.load()).await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "config reload task failed, using defaults");
                apply_env_overrides(Default::default()).drawing
            },
        }
    }
}

/// A fixed snapshot, for tests and one-shot invocations.
#[derive(Debug, Clone)]
pub struct StaticConfigSource(DrawingConfig);

impl StaticConfigSource {
    pub fn new(config: DrawingConfig) -> Self {
        Self(config)
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn drawing(&self) -> DrawingConfig {
        self.0.clone()
    }
}
