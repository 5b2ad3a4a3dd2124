//! Turning generated base64 into something the chat transport can show.

use {
    aidraw_media::MediaStore,
    anyhow::{Context, anyhow},
    async_trait::async_trait,
    tracing::debug,
    url::Url,
};

use crate::reply::DeliveredImage;

/// Accepts generated image data and returns a renderable reference.
///
/// `Ok(None)` means nothing usable was produced; the caller reports it the
/// same way as a response without an image.
#[async_trait]
pub trait ImageDelivery: Send + Sync {
    async fn deliver(&self, base64: &str) -> anyhow::Result<Option<DeliveredImage>>;
}

/// Writes images into a [`MediaStore`] and references them by `file://` URI.
pub struct MediaStoreDelivery {
    store: MediaStore,
}

impl MediaStoreDelivery {
    pub fn new(store: MediaStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ImageDelivery for MediaStoreDelivery {
    async fn deliver(&self, base64: &str) -> anyhow::Result<Option<DeliveredImage>> {
        if base64.trim().is_empty() {
            return Ok(None);
        }

        let saved = self.store.save_base64(base64).await?;
        let path = std::path::absolute(&saved.path)
            .with_context(|| format!("resolving {}", saved.path.display()))?;
        let uri = Url::from_file_path(&path)
            .map_err(|()| anyhow!("cannot express {} as a file URI", path.display()))?;

        debug!(uri = %uri, media_type = saved.media_type, "image delivered");
        Ok(Some(DeliveredImage::new(uri.to_string())))
    }
}
