use std::sync::Arc;

use {
    aidraw_gemini::{GenerationClient, ImageSelection, Part},
    aidraw_media::image_ops::{DEFAULT_JPEG_QUALITY, to_jpeg},
    axum::{
        Json,
        extract::{State, rejection::JsonRejection},
    },
    base64::{Engine as _, engine::general_purpose::STANDARD as BASE64},
    secrecy::Secret,
    serde::{Deserialize, Serialize},
    tracing::{info, warn},
};

use crate::{error::ProcessError, server::BackendState};

pub const SERVICE_NAME: &str = "aidraw backend";

/// `POST /process-image` body. All fields are optional on the wire so a
/// missing one is reported as a 400 instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessImageRequest {
    pub image_url: Option<String>,
    pub prompt: Option<String>,
    pub gemini_api_endpoint: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessImageResponse {
    pub success: bool,
    pub image_base64: String,
}

fn required(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

fn or_default<'a>(value: Option<&'a String>, fallback: &'a str) -> &'a str {
    required(value).unwrap_or(fallback)
}

pub async fn process_image(
    State(state): State<Arc<BackendState>>,
    body: Result<Json<ProcessImageRequest>, JsonRejection>,
) -> Result<Json<ProcessImageResponse>, ProcessError> {
    let Json(req) = body.map_err(|e| ProcessError::BadRequest(e.body_text()))?;

    let (Some(image_url), Some(prompt), Some(api_key)) = (
        required(req.image_url.as_ref()),
        required(req.prompt.as_ref()),
        required(req.gemini_api_key.as_ref()),
    ) else {
        warn!("process-image request missing required parameters");
        return Err(ProcessError::MissingParameters);
    };
    let endpoint = or_default(
        req.gemini_api_endpoint.as_ref(),
        &state.defaults.default_api_endpoint,
    );
    let model = or_default(req.gemini_model.as_ref(), &state.defaults.default_model);
    info!(endpoint, model, prompt_len = prompt.len(), "process-image request");

    let source = state.fetcher.fetch(image_url).await?;
    let jpeg = match to_jpeg(&source, DEFAULT_JPEG_QUALITY) {
        Ok(jpeg) => jpeg,
        Err(e) => {
            warn!(error = %e, "could not transcode source image, sending it unchanged");
            source
        },
    };

    let client = GenerationClient::new(
        state.generation_http.clone(),
        endpoint,
        Secret::new(api_key.to_string()),
        model,
    )
    .with_selection(ImageSelection::First);
    let generated = client
        .generate(&[Part::text(prompt), Part::jpeg(BASE64.encode(&jpeg))])
        .await?;

    info!(base64_len = generated.base64.len(), "process-image completed");
    Ok(Json(ProcessImageResponse {
        success: true,
        image_base64: generated.base64,
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": SERVICE_NAME }))
}
