//! Incoming chat message parsing.
//!
//! Images travel inline in the message body as `[CQ:image,file=<ref>]`
//! markers. Everything else is prompt text.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static IMAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[CQ:image,file=([^\]]+)\]").expect("image marker pattern is valid")
});

#[allow(clippy::expect_used)]
static LEADING_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\[CQ:image,file=[^\]]+\]\s*)*").expect("leading marker pattern is valid")
});

/// What one message asked for. Built once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingRequest {
    /// Prompt text with image markers and the command token removed.
    pub raw_text: String,
    /// Image references in message order.
    pub image_refs: Vec<String>,
}

impl IncomingRequest {
    /// The only image the pipeline ever carries. Extra images are ignored.
    pub fn first_image(&self) -> Option<&str> {
        self.image_refs.first().map(String::as_str)
    }
}

/// Format an image reference as an inline marker.
pub fn image_marker(reference: &str) -> String {
    format!("[CQ:image,file={reference}]")
}

/// All image references in `message`, in the order they appear.
pub fn extract_image_refs(message: &str) -> Vec<String> {
    IMAGE_MARKER
        .captures_iter(message)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// `message` with every image marker removed, trimmed.
pub fn strip_image_markers(message: &str) -> String {
    IMAGE_MARKER.replace_all(message, "").trim().to_string()
}

/// Skip whitespace and image markers at the start of `message`.
pub(crate) fn skip_leading_markers(message: &str) -> &str {
    match LEADING_MARKERS.find(message) {
        Some(m) => &message[m.end()..],
        None => message,
    }
}

/// Drop a leading `.cmd` / `/cmd` word.
fn strip_command_token(text: &str) -> &str {
    if !text.starts_with(['.', '/']) {
        return text;
    }
    match text.find(char::is_whitespace) {
        Some(idx) => text[idx..].trim_start(),
        None => "",
    }
}

/// Split a message into prompt text and image references.
///
/// Images are always taken from the full message. Non-empty `command_args`
/// win as the prompt; otherwise the prompt is the message minus its command
/// token.
pub fn parse(raw_message: &str, command_args: &str) -> IncomingRequest {
    let image_refs = extract_image_refs(raw_message);

    let raw_text = if command_args.trim().is_empty() {
        strip_command_token(&strip_image_markers(raw_message))
            .trim()
            .to_string()
    } else {
        strip_image_markers(command_args)
    };

    IncomingRequest {
        raw_text,
        image_refs,
    }
}
