use {
    aidraw_common::text::{preview, redact_query_param},
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, trace, warn},
};

use crate::{
    error::{Error, Result},
    types::{GenerateRequest, GenerateResponse, GeneratedImage, ImageSelection, Part},
};

/// Path segment between the API base URL and the model name.
pub const GENERATION_PATH: &str = "v1beta/models";

/// Build the `generateContent` URL for `model`.
///
/// One trailing slash on `endpoint` is dropped before joining. The key goes in
/// the `key` query parameter.
pub fn generation_url(endpoint: &str, model: &str, api_key: &str) -> String {
    let base = endpoint.strip_suffix('/').unwrap_or(endpoint);
    format!(
        "{base}/{GENERATION_PATH}/{model}:generateContent?key={}",
        urlencoding::encode(api_key)
    )
}

/// Issues one `generateContent` call per [`generate`](Self::generate) and
/// returns the image it produced.
pub struct GenerationClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Secret<String>,
    model: String,
    selection: ImageSelection,
}

impl GenerationClient {
    /// `http` is shared with other clients; timeouts, if any, come from it.
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: Secret<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key,
            model: model.into(),
            selection: ImageSelection::default(),
        }
    }

    /// Which image to return when the response carries several.
    #[must_use]
    pub fn with_selection(mut self, selection: ImageSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        generation_url(&self.endpoint, &self.model, self.api_key.expose_secret())
    }

    /// Send `parts` as a single content group and extract the output image.
    ///
    /// Makes exactly one attempt. A success response without an image is
    /// [`Error::NoImage`], not a transport or HTTP failure.
    pub async fn generate(&self, parts: &[Part]) -> Result<GeneratedImage> {
        let url = self.url();
        let body = GenerateRequest::new(parts);

        debug!(
            url = %redact_query_param(&url, "key"),
            model = %self.model,
            parts = parts.len(),
            "gemini generate request"
        );

        let http_resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "gemini request failed before a response");
                Error::Transport(e.without_url())
            })?;

        let status = http_resp.status();
        if !status.is_success() {
            let body_text = http_resp.text().await.unwrap_or_default();
            warn!(status = %status, body = %preview(&body_text, 500), "gemini API error");
            return Err(Error::Http {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let raw = http_resp
            .text()
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;
        let resp: GenerateResponse = serde_json::from_str(&raw).map_err(|e| {
            warn!(error = %e, body = %preview(&raw, 200), "gemini response is not valid JSON");
            Error::Decode(e)
        })?;
        trace!(candidates = resp.candidates.len(), "gemini raw response decoded");

        match resp.select_image(self.selection) {
            Some(image) => {
                debug!(
                    base64_len = image.base64.len(),
                    mime = image.mime_type.as_deref().unwrap_or("unknown"),
                    "gemini returned image"
                );
                Ok(image)
            },
            None => {
                warn!(
                    candidates = resp.candidates.len(),
                    body = %preview(&raw, 500),
                    "gemini response contained no image"
                );
                Err(Error::NoImage)
            },
        }
    }
}
