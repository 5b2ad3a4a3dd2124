//! Local chat host: stdin messages in, replies on stdout.

use std::{path::PathBuf, sync::Arc};

use {
    aidraw_config::{ConfigSource, FileConfigSource},
    aidraw_drawing::{
        CommandOutcome, CommandRegistry, DeliveredImage, MediaStoreDelivery, ReplySink,
        default_registry,
    },
    aidraw_media::MediaStore,
    anyhow::Result,
    async_trait::async_trait,
    tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    tracing::{debug, info},
};

use crate::load_config;

/// Prints replies to stdout, images as their inline marker.
struct StdoutSink;

#[async_trait]
impl ReplySink for StdoutSink {
    async fn send_text(&self, text: &str) -> Result<()> {
        let mut out = tokio::io::stdout();
        out.write_all(format!("{text}\n").as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }

    async fn send_image(&self, image: &DeliveredImage) -> Result<()> {
        self.send_text(&image.marker()).await
    }
}

/// Where delivered images go: `[media].dir`, else the user data dir, else
/// the system temp dir.
fn media_dir(configured: Option<PathBuf>, data_dir: Option<PathBuf>) -> PathBuf {
    configured
        .or_else(|| data_dir.map(|dir| dir.join("images")))
        .unwrap_or_else(|| std::env::temp_dir().join("aidraw-images"))
}

fn build_registry(config_path: Option<PathBuf>) -> Result<CommandRegistry> {
    let config = load_config(config_path.as_deref())?;
    let dir = media_dir(config.media.dir, aidraw_config::data_dir());
    info!(media_dir = %dir.display(), "images will be stored locally");

    let source: Arc<dyn ConfigSource> = Arc::new(match config_path {
        Some(path) => FileConfigSource::new(path),
        None => FileConfigSource::discover(),
    });
    let delivery = Arc::new(MediaStoreDelivery::new(MediaStore::new(dir)));
    Ok(default_registry(reqwest::Client::new(), source, delivery))
}

pub async fn run_chat(config_path: Option<PathBuf>) -> Result<()> {
    let registry = build_registry(config_path)?;
    eprintln!(
        "aidraw chat. Commands: {}. Attach images with [CQ:image,file=<url>]. Ctrl-D to quit.",
        registry
            .names()
            .iter()
            .map(|name| format!(".{name}"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match registry.dispatch(&line, &StdoutSink).await {
            Some(outcome) => debug!(?outcome, "command finished"),
            None => debug!("not a command, ignored"),
        }
    }
    Ok(())
}

/// Handle one message. A non-command counts as success.
pub async fn send_once(config_path: Option<PathBuf>, message: &str) -> Result<CommandOutcome> {
    let registry = build_registry(config_path)?;
    Ok(match registry.dispatch(message, &StdoutSink).await {
        Some(outcome) => outcome,
        None => {
            eprintln!("not a command: try .draw <prompt> or .draw-presets");
            CommandOutcome::Success
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_dir_prefers_config_then_data_dir() {
        assert_eq!(
            media_dir(Some("/srv/img".into()), Some("/data".into())),
            PathBuf::from("/srv/img")
        );
        assert_eq!(
            media_dir(None, Some("/data".into())),
            PathBuf::from("/data/images")
        );
        assert_eq!(
            media_dir(None, None),
            std::env::temp_dir().join("aidraw-images")
        );
    }
}
