//! Configuration validation.
//!
//! Checks a loaded config for settings that would make the drawing command
//! refuse to run or silently drop presets, and reports them as diagnostics.

use std::{collections::HashSet, fmt, path::PathBuf};

use crate::schema::{AidrawConfig, parse_preset_line};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "missing", "url", "preset", "feature"
    pub category: &'static str,
    /// Dotted path, e.g. "drawing.api_key"
    pub path: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.category, self.path, self.message
        )
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(
        &mut self,
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate an already-loaded config.
pub fn validate(config: &AidrawConfig) -> ValidationResult {
    let mut result = ValidationResult::default();
    let drawing = &config.drawing;

    match drawing.api_endpoint() {
        None => result.push(
            Severity::Error,
            "missing",
            "drawing.api_endpoint",
            "API endpoint is empty; the draw command will refuse to run",
        ),
        Some(endpoint) => check_http_url(&mut result, "drawing.api_endpoint", endpoint),
    }

    if drawing.api_key().is_none() {
        result.push(
            Severity::Warning,
            "missing",
            "drawing.api_key",
            "API key is not set (set it here or via AIDRAW_API_KEY / GEMINI_API_KEY)",
        );
    }

    if drawing.model.trim().is_empty() {
        result.push(
            Severity::Error,
            "missing",
            "drawing.model",
            "model is empty",
        );
    }

    match drawing.backend_url() {
        None => result.push(
            Severity::Info,
            "feature",
            "drawing.backend_url",
            "backend URL is empty; image-to-image is disabled",
        ),
        Some(url) => check_http_url(&mut result, "drawing.backend_url", url),
    }

    let mut seen = HashSet::new();
    for (idx, line) in drawing.preset_prompts.iter().enumerate() {
        let path = format!("drawing.preset_prompts[{idx}]");
        match parse_preset_line(line) {
            None => result.push(
                Severity::Warning,
                "preset",
                path,
                "expected \"keyword:expansion\" with both sides non-empty; entry is ignored",
            ),
            Some((keyword, _)) => {
                if !seen.insert(keyword.to_string()) {
                    result.push(
                        Severity::Warning,
                        "preset",
                        path,
                        format!("duplicate keyword \"{keyword}\"; this entry overrides the earlier one"),
                    );
                }
            },
        }
    }

    if config.backend.port == 0 {
        result.push(
            Severity::Error,
            "url",
            "backend.port",
            "port 0 is not a valid listen port",
        );
    }

    result
}

fn check_http_url(result: &mut ValidationResult, path: &str, raw: &str) {
    match url::Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {},
        Ok(url) => result.push(
            Severity::Error,
            "url",
            path,
            format!("unsupported scheme \"{}\" (expected http or https)", url.scheme()),
        ),
        Err(e) => result.push(
            Severity::Error,
            "url",
            path,
            format!("not a valid URL: {e}"),
        ),
    }
}
