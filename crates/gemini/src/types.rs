//! Wire types for `generateContent`.
//!
//! Request parts and response parts are explicit tagged shapes: a part is
//! either text or inline image data, decided once at (de)serialization time.

use serde::{Deserialize, Deserializer, Serialize};

/// MIME type attached to every image sent upstream.
pub const JPEG_MIME: &str = "image/jpeg";

/// Base64 image payload with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, alias = "mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

/// One element of a request's `parts` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineImage {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// A JPEG image part from already-encoded base64 data.
    pub fn jpeg(base64: impl Into<String>) -> Self {
        Self::InlineImage {
            inline_data: InlineData {
                mime_type: JPEG_MIME.to_string(),
                data: base64.into(),
            },
        }
    }
}

/// Request body: all parts go into a single content group.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestContent<'a> {
    pub parts: &'a [Part],
}

impl<'a> GenerateRequest<'a> {
    pub fn new(parts: &'a [Part]) -> Self {
        Self {
            contents: [RequestContent { parts }],
        }
    }
}

/// One element of a response candidate's `parts` array.
///
/// Variants are tried in order, so a part carrying `inlineData` is always an
/// image even if it also has text. Anything else (function calls, thought
/// signatures, future part kinds) lands in `Other` and is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResponsePart {
    InlineImage {
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
    Other(serde_json::Value),
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// Absent when the candidate was blocked (e.g. `finishReason: SAFETY`).
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<ResponsePart>,
}

/// The image pulled out of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: Option<String>,
    pub base64: String,
}

impl GenerateResponse {
    /// Parts of the first candidate, or an empty slice.
    pub fn first_candidate_parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }

    /// Inline images with non-empty data in the first candidate, in order.
    fn images(&self) -> impl Iterator<Item = GeneratedImage> + '_ {
        self.first_candidate_parts()
            .iter()
            .filter_map(|part| match part {
                ResponsePart::InlineImage { inline_data } if !inline_data.data.is_empty() => {
                    Some(GeneratedImage {
                        mime_type: Some(inline_data.mime_type.clone())
                            .filter(|mime| !mime.is_empty()),
                        base64: inline_data.data.clone(),
                    })
                },
                _ => None,
            })
    }

    /// The last inline image with non-empty data in the first candidate.
    ///
    /// Later image parts replace earlier ones; text parts are skipped.
    pub fn last_image(&self) -> Option<GeneratedImage> {
        self.images().last()
    }

    pub fn first_image(&self) -> Option<GeneratedImage> {
        self.images().next()
    }

    pub fn select_image(&self, selection: ImageSelection) -> Option<GeneratedImage> {
        match selection {
            ImageSelection::First => self.first_image(),
            ImageSelection::Last => self.last_image(),
        }
    }
}

/// Which inline image to keep when a candidate carries several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSelection {
    First,
    #[default]
    Last,
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn decode(value: serde_json::Value) -> GenerateResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_parts_serialize_to_gemini_shapes() {
        let parts = vec![Part::text("a cat"), Part::jpeg("QUJD")];
        let body = serde_json::to_value(GenerateRequest::new(&parts)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "parts": [
                        { "text": "a cat" },
                        { "inlineData": { "mimeType": "image/jpeg", "data": "QUJD" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn response_parts_decode_by_shape() {
        let resp = decode(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "here you go" },
                    { "inlineData": { "mimeType": "image/png", "data": "AAA" } },
                    { "functionCall": { "name": "x" } }
                ]}
            }]
        }));
        let parts = resp.first_candidate_parts();
        assert!(matches!(&parts[0], ResponsePart::Text { text } if text == "here you go"));
        assert!(matches!(&parts[1], ResponsePart::InlineImage { .. }));
        assert!(matches!(&parts[2], ResponsePart::Other(_)));
    }

    #[test]
    fn selects_image_from_second_part() {
        let resp = decode(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "description" },
                    { "inlineData": { "mimeType": "image/png", "data": "SECOND" } }
                ]}
            }]
        }));
        let image = resp.last_image().unwrap();
        assert_eq!(image.base64, "SECOND");
        assert_eq!(image.mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn later_image_parts_win() {
        let resp = decode(json!({
            "candidates": [{
                "content": { "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": "FIRST" } },
                    { "inlineData": { "mimeType": "image/png", "data": "LAST" } },
                    { "inlineData": { "mimeType": "image/png", "data": "" } }
                ]}
            }]
        }));
        assert_eq!(resp.last_image().unwrap().base64, "LAST");
        assert_eq!(resp.select_image(ImageSelection::First).unwrap().base64, "FIRST");
        assert_eq!(resp.select_image(ImageSelection::default()).unwrap().base64, "LAST");
    }

    #[test]
    fn snake_case_inline_data_is_accepted() {
        let resp = decode(json!({
            "candidates": [{
                "content": { "parts": [
                    { "inline_data": { "mime_type": "image/jpeg", "data": "SNAKE" } }
                ]}
            }]
        }));
        let image = resp.last_image().unwrap();
        assert_eq!(image.base64, "SNAKE");
        assert_eq!(image.mime_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn only_first_candidate_is_scanned() {
        let resp = decode(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "no image" }] } },
                { "content": { "parts": [{ "inlineData": { "mimeType": "image/png", "data": "X" } }] } }
            ]
        }));
        assert!(resp.last_image().is_none());
    }

    #[test]
    fn missing_pieces_yield_no_image() {
        assert!(decode(json!({})).last_image().is_none());
        assert!(decode(json!({ "candidates": [] })).last_image().is_none());
        assert!(
            decode(json!({ "candidates": [{ "finishReason": "SAFETY" }] }))
                .last_image()
                .is_none()
        );
    }

    #[test]
    fn null_candidates_and_parts_yield_no_image() {
        assert!(decode(json!({ "candidates": null })).last_image().is_none());
        assert!(
            decode(json!({ "candidates": [{ "content": { "parts": null } }] }))
                .last_image()
                .is_none()
        );
    }
}
