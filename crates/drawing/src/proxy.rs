//! Client for the image proxy service.
//!
//! The proxy fetches the source image, runs it through Gemini together with
//! the prompt, and hands back the result as base64. This client only forwards
//! parameters and interprets the reply.

use {
    aidraw_common::text::{preview, truncate_chars},
    serde::{Deserialize, Serialize},
    tracing::{debug, info, warn},
};

/// Maximum characters of a non-JSON error body quoted back to the user.
const ERROR_EXCERPT_CHARS: usize = 200;

/// Why the proxy did not produce an image.
///
/// The `Display` text is shown to the requester as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    /// Non-success status with a JSON `error` field.
    #[error("backend error: {0}")]
    Backend(String),

    /// Non-success status with some other body.
    #[error("backend service error ({status}): {excerpt}")]
    Status { status: u16, excerpt: String },

    /// Success status but no usable `image_base64`.
    #[error("backend response format error: missing image data")]
    MissingImage,

    /// The request never got a response.
    #[error(
        "cannot reach the backend service: {reason}\nPlease check:\n1. the backend service is \
         running\n2. the backend address is configured correctly\n3. firewall settings"
    )]
    Unreachable { reason: String },
}

/// JSON body sent to the proxy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest<'a> {
    pub image_url: &'a str,
    pub prompt: &'a str,
    pub gemini_api_endpoint: &'a str,
    pub gemini_api_key: &'a str,
    pub gemini_model: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProxyReply {
    #[serde(default)]
    image_base64: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProxyErrorBody {
    error: Option<String>,
}

pub struct ProxyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ProxyClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Send one transform request. No retries.
    ///
    /// Returns the transformed image as base64.
    pub async fn transform(&self, request: &ProxyRequest<'_>) -> Result<String, ProxyError> {
        debug!(
            endpoint = %self.endpoint,
            image = %preview(request.image_url, 100),
            model = request.gemini_model,
            "sending image to proxy"
        );
        let started = std::time::Instant::now();

        let resp = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "proxy unreachable");
                ProxyError::Unreachable {
                    reason: e.to_string(),
                }
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            warn!(error = %e, "failed to read proxy response body");
            ProxyError::Unreachable {
                reason: e.to_string(),
            }
        })?;
        info!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "proxy responded"
        );

        if !status.is_success() {
            warn!(status = %status, body = %preview(&body, 500), "proxy returned error");
            if let Ok(ProxyErrorBody { error: Some(error) }) = serde_json::from_str(&body)
                && !error.is_empty()
            {
                return Err(ProxyError::Backend(error));
            }
            return Err(ProxyError::Status {
                status: status.as_u16(),
                excerpt: truncate_chars(&body, ERROR_EXCERPT_CHARS).to_string(),
            });
        }

        match serde_json::from_str::<ProxyReply>(&body) {
            Ok(ProxyReply {
                image_base64: Some(image),
            }) if !image.is_empty() => {
                debug!(base64_len = image.len(), "proxy returned image");
                Ok(image)
            },
            _ => {
                warn!(body = %preview(&body, 200), "proxy response has no image_base64");
                Err(ProxyError::MissingImage)
            },
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, mockito::Matcher, serde_json::json};

    fn request() -> ProxyRequest<'static> {
        ProxyRequest {
            image_url: "https://img.example/cat.png",
            prompt: "oil painting",
            gemini_api_endpoint: "https://gemini.example",
            gemini_api_key: "secret",
            gemini_model: "m1",
        }
    }

    #[tokio::test]
    async fn forwards_camel_case_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/process-image")
            .match_body(Matcher::Json(json!({
                "imageUrl": "https://img.example/cat.png",
                "prompt": "oil painting",
                "geminiApiEndpoint": "https://gemini.example",
                "geminiApiKey": "secret",
                "geminiModel": "m1"
            })))
            .with_status(200)
            .with_body(json!({ "success": true, "image_base64": "QUJD" }).to_string())
            .create_async()
            .await;

        let client = ProxyClient::new(
            reqwest::Client::new(),
            format!("{}/process-image", server.url()),
        );
        assert_eq!(client.transform(&request()).await.unwrap(), "QUJD");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn json_error_field_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(500)
            .with_body(r#"{"error":"bad image"}"#)
            .create_async()
            .await;

        let err = ProxyClient::new(reqwest::Client::new(), server.url())
            .transform(&request())
            .await
            .unwrap_err();
        assert_eq!(err, ProxyError::Backend("bad image".into()));
        assert!(err.to_string().contains("bad image"));
    }

    #[tokio::test]
    async fn plain_error_body_is_truncated() {
        let mut server = mockito::Server::new_async().await;
        let long = "x".repeat(500);
        let _mock = server
            .mock("POST", "/")
            .with_status(502)
            .with_body(&long)
            .create_async()
            .await;

        let err = ProxyClient::new(reqwest::Client::new(), server.url())
            .transform(&request())
            .await
            .unwrap_err();
        match err {
            ProxyError::Status { status, excerpt } => {
                assert_eq!(status, 502);
                assert_eq!(excerpt.chars().count(), ERROR_EXCERPT_CHARS);
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_without_image_is_format_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(json!({ "success": true }).to_string())
            .create_async()
            .await;

        let err = ProxyClient::new(reqwest::Client::new(), server.url())
            .transform(&request())
            .await
            .unwrap_err();
        assert_eq!(err, ProxyError::MissingImage);
    }

    #[tokio::test]
    async fn connection_failure_lists_checks() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = ProxyClient::new(reqwest::Client::new(), format!("http://{addr}/process-image"))
            .transform(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::Unreachable { .. }));
        let text = err.to_string();
        assert!(text.contains("1. the backend service is running"));
        assert!(text.contains("3. firewall settings"));
    }
}
