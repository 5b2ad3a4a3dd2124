/// Config schema types (drawing command, proxy backend service, media store).
use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

pub const DEFAULT_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:35814/process-image";
pub const DEFAULT_BACKEND_PORT: u16 = 35814;
pub const DEFAULT_BACKEND_MODEL: &str = "gemini-2.0-flash-exp";

const DEFAULT_FIGURINE_PRESET: &str = "figurine:Your task is to create a photorealistic, \
masterpiece-quality image of a 1/7 scale commercialized figurine based on the user's character. \
The final image must be in a realistic style and environment. **Crucial Instruction on Face & \
Likeness:** The figurine's face is the most critical element. It must be a perfect, \
high-fidelity 3D translation of the character from the source image. The sculpt must be sharp, \
clean, and intricately detailed, accurately capturing the original artwork's facial structure, \
eye style, expression, and hair. Do NOT generate a generic or abstract face. **Scene \
Composition:** 1. **Figurine & Base:** Place the figure on a computer desk, standing on a \
simple, circular, transparent acrylic base WITHOUT any text or markings. 2. **Computer \
Monitor:** In the background, a monitor displays 3D modeling software with the digital sculpt \
of the same figurine. 3. **Artwork Display:** Next to the screen, a transparent acrylic board \
with a wooden base holds a print of the original 2D artwork. 4. **Environment:** A desk with a \
keyboard, natural and well-lit lighting, as if in a room.";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AidrawConfig {
    pub drawing: DrawingConfig,
    pub backend: BackendConfig,
    pub media: MediaConfig,
}

/// Options read by the drawing command on every invocation.
///
/// This is the complete set the orchestrator recognises; nothing else is
/// looked up by name at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    /// Gemini API base URL. A trailing slash is tolerated.
    pub api_endpoint: String,
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<Secret<String>>,
    pub model: String,
    /// Image proxy service URL. Empty disables image-to-image.
    pub backend_url: String,
    /// `"keyword:expansion"` lines, one preset per entry.
    pub preset_prompts: Vec<String>,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.into(),
            api_key: None,
            model: DEFAULT_MODEL.into(),
            backend_url: DEFAULT_BACKEND_URL.into(),
            preset_prompts: vec![DEFAULT_FIGURINE_PRESET.into()],
        }
    }
}

impl DrawingConfig {
    /// The API key, if set to something non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().trim())
            .filter(|key| !key.is_empty())
    }

    /// The API endpoint, if set to something non-blank.
    pub fn api_endpoint(&self) -> Option<&str> {
        Some(self.api_endpoint.trim()).filter(|endpoint| !endpoint.is_empty())
    }

    /// The proxy service URL, or `None` when image-to-image is disabled.
    pub fn backend_url(&self) -> Option<&str> {
        Some(self.backend_url.trim()).filter(|url| !url.is_empty())
    }
}

/// Settings for the bundled image proxy service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Address to bind to. Defaults to "0.0.0.0".
    pub bind: String,
    pub port: u16,
    /// Timeout for fetching the source image.
    pub download_timeout_secs: u64,
    /// Timeout for the Gemini call made on behalf of the caller.
    pub generation_timeout_secs: u64,
    /// Used when a request omits `geminiApiEndpoint`.
    pub default_api_endpoint: String,
    /// Used when a request omits `geminiModel`.
    pub default_model: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: DEFAULT_BACKEND_PORT,
            download_timeout_secs: 30,
            generation_timeout_secs: 60,
            default_api_endpoint: DEFAULT_API_ENDPOINT.into(),
            default_model: DEFAULT_BACKEND_MODEL.into(),
        }
    }
}

/// Where delivered images are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Output directory. Falls back to the user data dir, then the temp dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<std::path::PathBuf>,
}

/// Split a `"keyword:expansion"` preset line on its first colon.
///
/// Both halves are trimmed; colons inside the expansion are kept. Returns
/// `None` for lines without a colon or with an empty side.
pub fn parse_preset_line(line: &str) -> Option<(&str, &str)> {
    let (keyword, expansion) = line.split_once(':')?;
    let keyword = keyword.trim();
    let expansion = expansion.trim();
    if keyword.is_empty() || expansion.is_empty() {
        return None;
    }
    Some((keyword, expansion))
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
