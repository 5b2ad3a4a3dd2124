use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Why `/process-image` failed. Rendered as `{success: false, error}`.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error("missing required parameters: imageUrl, prompt, geminiApiKey")]
    MissingParameters,

    #[error("image download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("generation failed: {0}")]
    Generation(#[from] aidraw_gemini::Error),
}

impl ProcessError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::MissingParameters => StatusCode::BAD_REQUEST,
            Self::Download(_) | Self::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProcessError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({ "success": false, "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Fetching the source image failed.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("unsupported image reference: {0}")]
    UnsupportedReference(String),

    #[error("HTTP {status} from image host")]
    Status { status: u16 },

    #[error("{0}")]
    Transport(#[source] reqwest::Error),
}
