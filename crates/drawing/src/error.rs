use crate::{proxy::ProxyError, registry::CommandOutcome};

/// Which required setting was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSetting {
    /// API endpoint or API key.
    Credentials,
    /// Proxy URL, needed only when an image is attached.
    Backend,
}

/// What was wrong with the request itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    /// No text and no image.
    Empty,
    /// An image with no description.
    ImageWithoutText,
    /// Nothing left to send after composing the payload.
    NothingToProcess,
}

/// Every way a draw invocation can end early.
///
/// Each variant maps to one user-facing message ([`DrawError::user_message`])
/// and one exit signal ([`DrawError::outcome`]).
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("configuration missing: {0:?}")]
    ConfigurationMissing(MissingSetting),

    #[error("invalid input: {0:?}")]
    InputInvalid(InvalidInput),

    #[error("proxy failure: {0}")]
    ProxyFailure(#[from] ProxyError),

    #[error("generation API returned HTTP {status}")]
    GenerationHttpError { status: u16, body: String },

    #[error("generation response contained no image")]
    GenerationFormatError,

    #[error("generation request failed: {0}")]
    GenerationTransportError(String),

    #[error("image delivery failed: {0}")]
    DeliveryFailure(#[source] anyhow::Error),
}

impl From<aidraw_gemini::Error> for DrawError {
    fn from(err: aidraw_gemini::Error) -> Self {
        match err {
            aidraw_gemini::Error::Http { status, body } => {
                Self::GenerationHttpError { status, body }
            },
            aidraw_gemini::Error::NoImage => Self::GenerationFormatError,
            // An unreadable success body is reported like a network fault.
            other @ (aidraw_gemini::Error::Transport(_) | aidraw_gemini::Error::Decode(_)) => {
                Self::GenerationTransportError(other.to_string())
            },
        }
    }
}

impl DrawError {
    /// The single message the requester sees for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConfigurationMissing(MissingSetting::Credentials) => {
                "AI drawing is not configured. Ask the operator to set the API endpoint and API \
                 key."
                    .into()
            },
            Self::ConfigurationMissing(MissingSetting::Backend) => {
                "❌ Image-to-image needs the backend service.\n\nAsk the operator to set \
                 backend_url, or see the docs on deploying the backend service."
                    .into()
            },
            Self::InputInvalid(InvalidInput::Empty) => String::new(),
            Self::InputInvalid(InvalidInput::ImageWithoutText) => {
                "❌ Image-to-image needs a text description as well.\n\nExample, in one \
                 message:\n[image] .draw turn this picture into an oil painting"
                    .into()
            },
            Self::InputInvalid(InvalidInput::NothingToProcess) => {
                "❌ Cannot process the request. Provide text or a valid image.".into()
            },
            Self::ProxyFailure(err) => {
                format!("❌ Image-to-image failed\n\n{err}\n\n💡 See the service logs for details.")
            },
            Self::GenerationHttpError { status, .. } => {
                format!("AI service request failed, status code: {status}")
            },
            Self::GenerationFormatError => "❌ No image was returned, please retry.".into(),
            Self::GenerationTransportError(_) => {
                "Network error while calling the AI service. Check the logs or the API \
                 endpoint setting."
                    .into()
            },
            Self::DeliveryFailure(err) => {
                format!("❌ The image was generated but could not be delivered: {err}")
            },
        }
    }

    /// The exit signal for this error.
    ///
    /// Usage hints, missing configuration, and "no image, retry" are not
    /// failures.
    pub fn outcome(&self) -> CommandOutcome {
        match self {
            Self::InputInvalid(InvalidInput::Empty) => CommandOutcome::ShowHelp,
            Self::ConfigurationMissing(_)
            | Self::InputInvalid(InvalidInput::ImageWithoutText)
            | Self::GenerationFormatError => CommandOutcome::Success,
            Self::InputInvalid(InvalidInput::NothingToProcess)
            | Self::ProxyFailure(_)
            | Self::GenerationHttpError { .. }
            | Self::GenerationTransportError(_)
            | Self::DeliveryFailure(_) => CommandOutcome::Failure,
        }
    }
}
