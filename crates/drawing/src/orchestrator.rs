//! The `draw` command: parse, gate on config, proxy, generate, deliver.

use std::{sync::Arc, time::Instant};

use {
    aidraw_config::ConfigSource,
    aidraw_gemini::GenerationClient,
    async_trait::async_trait,
    secrecy::Secret,
    tracing::{debug, info, warn},
};

use crate::{
    compose::compose,
    delivery::ImageDelivery,
    error::{DrawError, InvalidInput, MissingSetting},
    message,
    presets::{PresetTable, ResolvedPrompt},
    proxy::{ProxyClient, ProxyRequest},
    registry::{CommandContext, CommandHandler, CommandOutcome},
    reply::ReplySink,
};

pub const DRAW_COMMAND: &str = "draw";

const DRAW_HELP: &str = "Draw with an AI image model.

[Text to image]
Usage: .draw <prompt>
Example: .draw a cute cat

[Image to image]
Send an image and the command in the same message.
Example: [image] .draw turn this picture into an oil painting

[Presets]
Usage: .draw <keyword>
Example: .draw figurine

Use .draw-presets to list the available keywords.

Note:
- image to image needs the backend service
- presets are set in the config file";

/// Primary drawing command.
///
/// Holds no per-request state; concurrent invocations share only the HTTP
/// connection pool.
pub struct DrawCommand {
    http: reqwest::Client,
    config: Arc<dyn ConfigSource>,
    delivery: Arc<dyn ImageDelivery>,
}

impl DrawCommand {
    pub fn new(
        http: reqwest::Client,
        config: Arc<dyn ConfigSource>,
        delivery: Arc<dyn ImageDelivery>,
    ) -> Self {
        Self {
            http,
            config,
            delivery,
        }
    }

    async fn run(&self, ctx: &CommandContext, sink: &dyn ReplySink) -> Result<(), DrawError> {
        let request = message::parse(&ctx.raw_message, &ctx.args);
        if request.raw_text.is_empty() {
            return Err(DrawError::InputInvalid(if request.image_refs.is_empty() {
                InvalidInput::Empty
            } else {
                InvalidInput::ImageWithoutText
            }));
        }

        let config = self.config.drawing().await;
        let prompt = PresetTable::from_lines(&config.preset_prompts).resolve(&request.raw_text);

        let (Some(endpoint), Some(api_key)) = (config.api_endpoint(), config.api_key()) else {
            return Err(DrawError::ConfigurationMissing(MissingSetting::Credentials));
        };
        let image = match (request.first_image(), config.backend_url()) {
            (Some(_), None) => {
                return Err(DrawError::ConfigurationMissing(MissingSetting::Backend));
            },
            (Some(image_ref), Some(backend_url)) => Some((image_ref, backend_url)),
            (None, _) => None,
        };

        reply(sink, &status_message(&prompt, request.image_refs.len())).await;
        let started = Instant::now();
        info!(
            preset = prompt.original_keyword.as_deref().unwrap_or("-"),
            images = request.image_refs.len(),
            model = %config.model,
            "draw request accepted"
        );

        let proxied = match image {
            Some((image_ref, backend_url)) => {
                if request.image_refs.len() > 1 {
                    debug!(
                        ignored = request.image_refs.len() - 1,
                        "only the first image is processed"
                    );
                }
                let proxy = ProxyClient::new(self.http.clone(), backend_url);
                let transformed = proxy
                    .transform(&ProxyRequest {
                        image_url: image_ref,
                        prompt: &prompt.effective_text,
                        gemini_api_endpoint: endpoint,
                        gemini_api_key: api_key,
                        gemini_model: &config.model,
                    })
                    .await?;
                Some(transformed)
            },
            None => None,
        };

        let parts = compose(Some(&prompt.effective_text), proxied.as_deref());
        if parts.is_empty() {
            return Err(DrawError::InputInvalid(InvalidInput::NothingToProcess));
        }

        let client = GenerationClient::new(
            self.http.clone(),
            endpoint,
            Secret::new(api_key.to_string()),
            config.model.as_str(),
        );
        let generated = client.generate(&parts).await?;

        let delivered = self
            .delivery
            .deliver(&generated.base64)
            .await
            .map_err(DrawError::DeliveryFailure)?
            .ok_or(DrawError::GenerationFormatError)?;

        if let Err(e) = sink.send_image(&delivered).await {
            return Err(DrawError::DeliveryFailure(e));
        }
        reply(
            sink,
            &completion_message(proxied.is_some(), started.elapsed().as_secs_f64()),
        )
        .await;
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for DrawCommand {
    fn name(&self) -> &str {
        DRAW_COMMAND
    }

    fn help(&self) -> &str {
        DRAW_HELP
    }

    async fn handle(&self, ctx: &CommandContext, sink: &dyn ReplySink) -> CommandOutcome {
        match self.run(ctx, sink).await {
            Ok(()) => CommandOutcome::Success,
            Err(err) => {
                let outcome = err.outcome();
                match outcome {
                    CommandOutcome::Failure => warn!(error = %err, "draw failed"),
                    _ => debug!(error = %err, "draw ended early"),
                }
                if outcome != CommandOutcome::ShowHelp {
                    reply(sink, &err.user_message()).await;
                }
                outcome
            },
        }
    }
}

/// Sent once the request is accepted, before any network call.
fn status_message(prompt: &ResolvedPrompt, image_count: usize) -> String {
    let mut status = String::new();
    if let Some(keyword) = &prompt.original_keyword {
        status.push_str(&format!("Using preset [{keyword}], "));
    }
    if image_count > 0 {
        status.push_str(&format!(
            "detected {image_count} image(s), processing image-to-image request..."
        ));
    } else {
        status.push_str("drawing, please wait...");
    }
    capitalize_first(status)
}

fn completion_message(image_to_image: bool, elapsed_secs: f64) -> String {
    if image_to_image {
        format!("✅ Image-to-image done in {elapsed_secs:.1}s")
    } else {
        format!("✅ Drawing done in {elapsed_secs:.1}s")
    }
}

fn capitalize_first(text: String) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

async fn reply(sink: &dyn ReplySink, text: &str) {
    if let Err(e) = sink.send_text(text).await {
        warn!(error = %e, "failed to send reply");
    }
}
