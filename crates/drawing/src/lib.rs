//! Chat-driven AI drawing.
//!
//! A message such as `[CQ:image,file=...] .draw oil painting` is parsed,
//! resolved against keyword presets, optionally routed through the image
//! proxy service, sent to Gemini, and answered with the generated image.

pub mod compose;
pub mod delivery;
pub mod error;
pub mod message;
pub mod orchestrator;
pub mod presets;
pub mod presets_command;
pub mod proxy;
pub mod registry;
pub mod reply;

use std::sync::Arc;

pub use {
    compose::compose,
    delivery::{ImageDelivery, MediaStoreDelivery},
    error::DrawError,
    message::{IncomingRequest, parse},
    orchestrator::{DRAW_COMMAND, DrawCommand},
    presets::{PresetTable, ResolvedPrompt, resolve},
    presets_command::{PRESETS_COMMAND, PresetListCommand},
    proxy::{ProxyClient, ProxyError, ProxyRequest},
    registry::{CommandContext, CommandHandler, CommandOutcome, CommandRegistry},
    reply::{DeliveredImage, ReplySink},
};

/// A registry with `draw` and `draw-presets`, sharing one config source.
pub fn default_registry(
    http: reqwest::Client,
    config: Arc<dyn aidraw_config::ConfigSource>,
    delivery: Arc<dyn ImageDelivery>,
) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(DrawCommand::new(
        http,
        Arc::clone(&config),
        delivery,
    )));
    registry.register(Arc::new(PresetListCommand::new(config)));
    registry
}
