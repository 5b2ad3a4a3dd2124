use std::path::{Path, PathBuf};

use {
    base64::{Engine as _, engine::general_purpose::STANDARD as BASE64},
    tracing::{debug, warn},
};

use crate::{
    error::{Error, Result},
    image_ops::{detect_format, extension, get_image_metadata, media_type},
};

/// An image written to disk by [`MediaStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub path: PathBuf,
    pub media_type: &'static str,
    pub size: usize,
}

/// Writes generated images to a directory as `<uuid>.<ext>`.
#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Decode base64 image data and store it.
    ///
    /// The extension comes from the image's own signature, not from any MIME
    /// type the producer claimed.
    pub async fn save_base64(&self, data: &str) -> Result<SavedImage> {
        let bytes = BASE64.decode(data.trim().as_bytes())?;
        self.save_bytes(&bytes).await
    }

    pub async fn save_bytes(&self, bytes: &[u8]) -> Result<SavedImage> {
        let format = detect_format(bytes)?;
        match get_image_metadata(bytes) {
            Ok(meta) => debug!(width = meta.width, height = meta.height, "storing image"),
            Err(e) => warn!(error = %e, "could not read image dimensions, storing anyway"),
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::io(&self.dir, e))?;

        let path = self
            .dir
            .join(format!("{}.{}", uuid::Uuid::new_v4(), extension(format)));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| Error::io(&path, e))?;

        debug!(path = %path.display(), size = bytes.len(), "stored image");
        Ok(SavedImage {
            path,
            media_type: media_type(format),
            size: bytes.len(),
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::image_ops::tests::png_bytes};

    #[tokio::test]
    async fn saves_decoded_png_with_sniffed_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().join("images"));
        let encoded = BASE64.encode(png_bytes(2, 2));

        let saved = store.save_base64(&encoded).await.unwrap();

        assert_eq!(saved.media_type, "image/png");
        assert_eq!(saved.path.extension().unwrap(), "png");
        assert!(saved.path.starts_with(store.dir()));
        let on_disk = tokio::fs::read(&saved.path).await.unwrap();
        assert_eq!(on_disk.len(), saved.size);
    }

    #[tokio::test]
    async fn rejects_invalid_base64() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());
        let err = store.save_base64("***not base64***").await.unwrap_err();
        assert!(matches!(err, Error::Base64(_)));
    }

    #[tokio::test]
    async fn rejects_non_image_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());
        let err = store
            .save_base64(&BASE64.encode(b"hello world"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownFormat));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
