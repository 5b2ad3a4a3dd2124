//! The `draw-presets` command.

use std::sync::Arc;

use {aidraw_config::ConfigSource, async_trait::async_trait, tracing::warn};

use crate::{
    presets::PresetTable,
    registry::{CommandContext, CommandHandler, CommandOutcome},
    reply::ReplySink,
};

pub const PRESETS_COMMAND: &str = "draw-presets";

/// Lists the preset keywords from the current config.
pub struct PresetListCommand {
    config: Arc<dyn ConfigSource>,
}

impl PresetListCommand {
    pub fn new(config: Arc<dyn ConfigSource>) -> Self {
        Self { config }
    }
}

fn listing(table: &PresetTable) -> String {
    if table.is_empty() {
        return "No preset prompts are configured.".into();
    }
    let keywords: Vec<&str> = table.keywords().collect();
    format!("Available preset keywords:\n- {}", keywords.join("\n- "))
}

#[async_trait]
impl CommandHandler for PresetListCommand {
    fn name(&self) -> &str {
        PRESETS_COMMAND
    }

    fn help(&self) -> &str {
        "List the available preset prompt keywords."
    }

    async fn handle(&self, _ctx: &CommandContext, sink: &dyn ReplySink) -> CommandOutcome {
        let table = PresetTable::from_lines(&self.config.drawing().await.preset_prompts);
        if let Err(e) = sink.send_text(&listing(&table)).await {
            warn!(error = %e, "failed to send preset list");
        }
        CommandOutcome::Success
    }
}
