//! Configuration loading, env substitution, validation, and per-invocation
//! snapshots.
//!
//! Config files: `aidraw.toml`, `aidraw.yaml`, `aidraw.yml`, or `aidraw.json`
//! Searched in `./` then `~/.config/aidraw/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod source;
pub mod template;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{
        apply_env_overrides, config_dir, data_dir, discover_and_load, find_config_file,
        load_config, write_default_config,
    },
    schema::{AidrawConfig, BackendConfig, DrawingConfig, MediaConfig, parse_preset_line},
    source::{ConfigSource, FileConfigSource, StaticConfigSource},
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
