use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    env_subst::substitute_env,
    error::{Context, Error, Result},
    schema::AidrawConfig,
    template::default_config_template,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["aidraw.toml", "aidraw.yaml", "aidraw.yml", "aidraw.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<AidrawConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./aidraw.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/aidraw/aidraw.{toml,yaml,yml,json}` (user-global)
///
/// Returns `AidrawConfig::default()` if no config file is found or the
/// file fails to parse.
pub fn discover_and_load() -> AidrawConfig {
    match find_config_file() {
        Some(path) => load_or_default(&path),
        None => {
            debug!("no config file found, using defaults");
            AidrawConfig::default()
        },
    }
}

/// Load `path`, logging and falling back to defaults on failure.
pub(crate) fn load_or_default(path: &Path) -> AidrawConfig {
    debug!(path = %path.display(), "loading config");
    load_config(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
        AidrawConfig::default()
    })
}

/// Find the first config file in standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists());
    if local.is_some() {
        return local;
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/aidraw/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "aidraw").map(|d| d.config_dir().to_path_buf())
}

/// Returns the user data directory used for generated images.
pub fn data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "aidraw").map(|d| d.data_dir().to_path_buf())
}

/// Overlay `AIDRAW_*` environment variables on top of file values.
///
/// `AIDRAW_API_KEY` falls back to `GEMINI_API_KEY`.
pub fn apply_env_overrides(config: AidrawConfig) -> AidrawConfig {
    apply_env_overrides_with(config, |name| std::env::var(name).ok())
}

fn apply_env_overrides_with(
    mut config: AidrawConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AidrawConfig {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(endpoint) = non_empty("AIDRAW_API_ENDPOINT") {
        config.drawing.api_endpoint = endpoint;
    }
    if let Some(key) = non_empty("AIDRAW_API_KEY").or_else(|| non_empty("GEMINI_API_KEY")) {
        config.drawing.api_key = Some(Secret::new(key));
    }
    if let Some(model) = non_empty("AIDRAW_MODEL") {
        config.drawing.model = model;
    }
    // An explicitly empty value is meaningful here: it turns image-to-image off.
    if let Some(url) = lookup("AIDRAW_BACKEND_URL") {
        config.drawing.backend_url = url;
    }
    config
}

/// Write the documented default template to `path`.
///
/// Refuses to overwrite an existing file. Creates parent directories.
pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::Message(format!(
            "{} already exists, not overwriting",
            path.display()
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, default_config_template())?;
    debug!(path = %path.display(), "wrote default config");
    Ok(())
}

fn parse_config(raw: &str, path: &Path) -> Result<AidrawConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => Err(Error::unsupported_format(ext)),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_toml_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("aidraw.toml");
        std::fs::write(&toml_path, "[drawing]\nmodel = \"m-toml\"\n").unwrap();
        assert_eq!(load_config(&toml_path).unwrap().drawing.model, "m-toml");

        let yaml_path = dir.path().join("aidraw.yaml");
        std::fs::write(&yaml_path, "drawing:\n  model: m-yaml\n").unwrap();
        assert_eq!(load_config(&yaml_path).unwrap().drawing.model, "m-yaml");

        let json_path = dir.path().join("aidraw.json");
        std::fs::write(&json_path, r#"{"drawing":{"model":"m-json"}}"#).unwrap();
        assert_eq!(load_config(&json_path).unwrap().drawing.model, "m-json");
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aidraw.ini");
        std::fs::write(&path, "x").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format: .ini"));
    }

    #[test]
    fn missing_file_error_names_path() {
        let err = load_config(Path::new("/nonexistent/aidraw.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read /nonexistent/aidraw.toml"));
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aidraw.toml");
        std::fs::write(&path, "[drawing\nnot toml").unwrap();
        let cfg = load_or_default(&path);
        assert_eq!(cfg.drawing.model, crate::schema::DEFAULT_MODEL);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let lookup = |name: &str| match name {
            "AIDRAW_API_ENDPOINT" => Some("https://proxy.example".to_string()),
            "GEMINI_API_KEY" => Some("from-gemini-env".to_string()),
            "AIDRAW_MODEL" => Some("  ".to_string()),
            "AIDRAW_BACKEND_URL" => Some(String::new()),
            _ => None,
        };
        let cfg = apply_env_overrides_with(AidrawConfig::default(), lookup);
        assert_eq!(cfg.drawing.api_endpoint, "https://proxy.example");
        assert_eq!(cfg.drawing.api_key(), Some("from-gemini-env"));
        assert_eq!(cfg.drawing.model, crate::schema::DEFAULT_MODEL);
        assert!(cfg.drawing.backend_url().is_none());
    }

    #[test]
    fn aidraw_key_wins_over_gemini_key() {
        let lookup = |name: &str| match name {
            "AIDRAW_API_KEY" => Some("primary".to_string()),
            "GEMINI_API_KEY" => Some("secondary".to_string()),
            _ => None,
        };
        let cfg = apply_env_overrides_with(AidrawConfig::default(), lookup);
        assert_eq!(cfg.drawing.api_key(), Some("primary"));
    }

    #[test]
    fn default_template_is_written_once_and_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("aidraw.toml");
        write_default_config(&path).unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.drawing.model, crate::schema::DEFAULT_MODEL);
        assert!(write_default_config(&path).is_err());
    }
}
