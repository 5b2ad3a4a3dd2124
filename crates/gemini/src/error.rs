/// Crate-wide result type for generation calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Ways a generation call can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API answered with a non-success status.
    #[error("Gemini API error HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Success status, but no inline image part in the first candidate.
    #[error("Gemini response contained no image")]
    NoImage,

    /// The request never got a response (DNS, connect, timeout, reset).
    #[error("Gemini request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Success status, but the body was not the expected JSON.
    #[error("Gemini response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// HTTP status code, when the API answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
