//! Default configuration template with all options documented.
//!
//! Written by `aidraw config init`. Every option is listed with its default
//! so operators can see what is tunable without reading the source.

use crate::schema::{
    DEFAULT_API_ENDPOINT, DEFAULT_BACKEND_MODEL, DEFAULT_BACKEND_PORT, DEFAULT_BACKEND_URL,
    DEFAULT_MODEL,
};

/// Generate the default config template.
pub fn default_config_template() -> String {
    format!(
        r##"# aidraw configuration
# ====================
# Environment variable substitution is supported: ${{ENV_VAR}}
# and ${{ENV_VAR:-fallback}}.
# Example: api_key = "${{GEMINI_API_KEY}}"
#
# The [drawing] section is re-read on every command, so edits take effect
# on the next message without a restart.

# ══════════════════════════════════════════════════════════════════════════════
# DRAWING COMMAND
# ══════════════════════════════════════════════════════════════════════════════

[drawing]
api_endpoint = "{DEFAULT_API_ENDPOINT}"   # Gemini API base URL
# api_key = "${{GEMINI_API_KEY}}"              # Required. Also read from AIDRAW_API_KEY / GEMINI_API_KEY
model = "{DEFAULT_MODEL}"                     # Image-capable Gemini model
backend_url = "{DEFAULT_BACKEND_URL}"   # Image proxy service; "" disables image-to-image

# Preset prompts, one "keyword:expansion" per entry. Sending the keyword on its
# own as the prompt expands it. Later duplicates win.
preset_prompts = [
  "watercolor:Repaint the subject as a soft watercolor illustration on textured paper.",
]

# ══════════════════════════════════════════════════════════════════════════════
# IMAGE PROXY SERVICE (aidraw backend)
# ══════════════════════════════════════════════════════════════════════════════

[backend]
bind = "0.0.0.0"
port = {DEFAULT_BACKEND_PORT}
download_timeout_secs = 30                    # Fetching the source image
generation_timeout_secs = 60                  # Gemini call made by the service
default_api_endpoint = "{DEFAULT_API_ENDPOINT}"
default_model = "{DEFAULT_BACKEND_MODEL}"

# ══════════════════════════════════════════════════════════════════════════════
# MEDIA
# ══════════════════════════════════════════════════════════════════════════════

[media]
# dir = "/var/lib/aidraw/images"              # Defaults to the user data dir
"##
    )
}
