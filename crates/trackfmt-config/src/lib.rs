#![deny(unsafe_code)]

//! Configuration loading and validation for trackfmt.
//!
//! Loads TOML configuration files and validates them. [`AppConfig`] is the
//! central configuration structure; it holds format limits, logging
//! settings, extra metadata aliases, and named format presets.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
///
/// ## TOML Example
///
/// ```toml
/// [format]
/// max_length = 4096
///
/// [logging]
/// level = "debug"
///
/// [metadata.aliases]
/// url = "xesam:url"
///
/// [presets]
/// now_playing = "{{artist}} - {{title}}"
/// ```
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Format string limits.
    #[serde(default)]
    pub format: FormatConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metadata context construction.
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Named format strings, selectable instead of a literal format.
    #[serde(default)]
    pub presets: BTreeMap<String, String>,
}

/// Format string limits.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Maximum accepted format string length in bytes. Longer formats are
    /// rejected, never truncated. Unset means no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metadata context construction.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Extra short aliases, mapping alias name to the raw metadata key it
    /// copies (e.g. `url = "xesam:url"`). Applied after the built-in
    /// `artist`, `album` and `title` aliases.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded config file");
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.format.max_length == Some(0) {
            return Err(ConfigError::Validation(
                "format.max_length must be non-zero when set".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        for (alias, source) in &self.metadata.aliases {
            if alias.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "metadata.aliases keys must not be empty".to_string(),
                ));
            }
            if source.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "metadata.aliases.{alias:?} must name a metadata key"
                )));
            }
        }

        for (name, format) in &self.presets {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "presets keys must not be empty".to_string(),
                ));
            }
            if format.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "presets.{name:?} must not be empty"
                )));
            }
            match self.format.max_length {
                Some(max) if format.len() > max => {
                    return Err(ConfigError::Validation(format!(
                        "presets.{name:?} is {} bytes, over format.max_length ({max})",
                        format.len()
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Look up a preset format string by name.
    pub fn preset(&self, name: &str) -> Option<&str> {
        self.presets.get(name).map(String::as_str)
    }
}
