//! Gemini `generateContent` client for image output.
//!
//! Builds multimodal requests from typed [`Part`]s and pulls the generated
//! image back out of the heterogeneous part list in the response.

pub mod client;
pub mod error;
pub mod types;

pub use {
    client::{GENERATION_PATH, GenerationClient, generation_url},
    error::{Error, Result},
    types::{GeneratedImage, ImageSelection, InlineData, JPEG_MIME, Part, ResponsePart},
};
