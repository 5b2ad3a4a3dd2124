//! Text helpers for log lines and user-facing error excerpts.

/// Return at most `max_chars` characters of `input`.
///
/// Counts `char`s, not bytes, so multi-byte text is never split mid-character.
#[must_use]
pub fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

/// Like [`truncate_chars`] but appends `...` when something was cut off.
#[must_use]
pub fn preview(input: &str, max_chars: usize) -> String {
    let head = truncate_chars(input, max_chars);
    if head.len() < input.len() {
        format!("{head}...")
    } else {
        head.to_string()
    }
}

/// Replace the value of query parameter `name` in `url` with `***`.
///
/// Used before logging request URLs that carry credentials.
#[must_use]
pub fn redact_query_param(url: &str, name: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let redacted: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if key == name => format!("{key}=***"),
            _ => pair.to_string(),
        })
        .collect();
    format!("{base}?{}", redacted.join("&"))
}
