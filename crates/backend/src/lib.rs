//! The image proxy service.
//!
//! `POST /process-image` downloads the referenced image, re-encodes it as
//! JPEG, sends it to Gemini with the prompt, and returns the generated image
//! as base64. `GET /health` is a liveness probe.

pub mod download;
pub mod error;
pub mod routes;
pub mod server;

pub use {
    error::{DownloadError, ProcessError},
    routes::{ProcessImageRequest, ProcessImageResponse},
    server::{BackendState, build_app, serve},
};
