use std::path::PathBuf;

/// Crate-wide result type for media operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The payload was not valid base64.
    #[error("image data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The bytes do not start with any known image signature.
    #[error("image data is not a recognised image format")]
    UnknownFormat,

    /// Decoding or encoding through the `image` crate failed.
    #[error("{context}: {source}")]
    Image {
        context: &'static str,
        #[source]
        source: image::ImageError,
    },

    /// Filesystem access failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    #[must_use]
    pub fn image(context: &'static str, source: image::ImageError) -> Self {
        Self::Image { context, source }
    }

    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
