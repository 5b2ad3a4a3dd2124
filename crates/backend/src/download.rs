//! Source image retrieval.

use std::time::Duration;

use {
    aidraw_common::text::preview,
    tracing::{debug, info, warn},
    url::Url,
};

use crate::error::DownloadError;

/// Fetches the image named by an `imageUrl` field.
///
/// Only `http` and `https` URLs are accepted. Local paths and other schemes
/// are rejected before any I/O so callers cannot read files off this host.
#[derive(Clone)]
pub struct ImageFetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl ImageFetcher {
    pub fn new(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    pub async fn fetch(&self, image_ref: &str) -> Result<Vec<u8>, DownloadError> {
        let url = Url::parse(image_ref)
            .map_err(|_| DownloadError::UnsupportedReference(preview(image_ref, 100)))?;
        debug!(url = %preview(image_ref, 100), scheme = url.scheme(), "fetching source image");

        let bytes = match url.scheme() {
            "http" | "https" => self.fetch_http(url).await?,
            other => {
                warn!(scheme = other, "rejected image reference");
                return Err(DownloadError::UnsupportedReference(format!("{other}: scheme")));
            },
        };

        info!(size = bytes.len(), "source image downloaded");
        Ok(bytes)
    }

    async fn fetch_http(&self, url: Url) -> Result<Vec<u8>, DownloadError> {
        let resp = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "image download failed");
                DownloadError::Transport(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = %status, "image host returned error");
            return Err(DownloadError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await.map_err(DownloadError::Transport)?;
        Ok(bytes.to_vec())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> ImageFetcher {
        ImageFetcher::new(reqwest::Client::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn downloads_over_http() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cat.png")
            .with_status(200)
            .with_body(b"PNGDATA")
            .create_async()
            .await;

        let bytes = fetcher()
            .fetch(&format!("{}/cat.png", server.url()))
            .await
            .unwrap();
        assert_eq!(bytes, b"PNGDATA");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn host_error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/gone.png")
            .with_status(404)
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/gone.png", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Status { status: 404 }));
    }

    #[tokio::test]
    async fn refuses_local_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.txt");
        std::fs::write(&path, b"TOPSECRET").unwrap();
        let uri = Url::from_file_path(&path).unwrap();

        let err = fetcher().fetch(uri.as_str()).await.unwrap_err();
        assert!(matches!(err, DownloadError::UnsupportedReference(_)));
    }

    #[tokio::test]
    async fn rejects_other_references() {
        for reference in ["not a url", "ftp://host/x.png"] {
            let err = fetcher().fetch(reference).await.unwrap_err();
            assert!(matches!(err, DownloadError::UnsupportedReference(_)));
        }
    }
}
