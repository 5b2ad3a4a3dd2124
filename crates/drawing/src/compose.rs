//! Request payload assembly.

use aidraw_gemini::Part;

/// Build the generation parts: the prompt first if non-empty, then the
/// proxied image as JPEG if present.
///
/// Empty output means there is nothing to send.
pub fn compose(prompt_text: Option<&str>, proxied_image_base64: Option<&str>) -> Vec<Part> {
    let mut parts = Vec::with_capacity(2);
    if let Some(text) = prompt_text.filter(|text| !text.is_empty()) {
        parts.push(Part::text(text));
    }
    if let Some(image) = proxied_image_base64 {
        parts.push(Part::jpeg(image));
    }
    parts
}
