//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::HostConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::filter::{ConfigError, ContentFilter};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML or JSON file.
pub fn load_config(path: &Path) -> Result<HostConfig, LoadError> {
    let content = fs::read_to_string(path)?;

    let config: HostConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") | None => toml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        Some(other) => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    validate_config(&config).map_err(LoadError::Validation)?;

    Ok(config)
}

/// Compile the filter described by `config`, applying the body size limit.
pub fn build_filter(config: &HostConfig) -> Result<ContentFilter, ConfigError> {
    Ok(ContentFilter::new(&config.filter)?.with_body_limit(config.limits.max_body_bytes))
}
