//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values
//! without repeating TOML snippets across crate boundaries, and
//! [`TestConfigFile`] when a test needs a config file on disk.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use trackfmt_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .max_length(64)
///     .preset("short", "{{title}}")
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.config.format.max_length = Some(max);
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn alias(mut self, alias: &str, source: &str) -> Self {
        self.config
            .metadata
            .aliases
            .insert(alias.to_string(), source.to_string());
        self
    }

    pub fn preset(mut self, name: &str, format: &str) -> Self {
        self.config
            .presets
            .insert(name.to_string(), format.to_string());
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A config file in a temporary directory.
///
/// The directory is deleted when this value is dropped, even on panic.
pub struct TestConfigFile {
    path: PathBuf,
    temp_dir: TempDir,
}

impl TestConfigFile {
    /// Write `toml_content` to `trackfmt.toml` in a fresh temp directory.
    pub fn with_toml(toml_content: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("trackfmt.toml");
        std::fs::write(&path, toml_content).expect("failed to write test config");
        Self { path, temp_dir }
    }

    /// Serialize `config` and write it to a fresh temp directory.
    pub fn with_config(config: &AppConfig) -> Self {
        let content = toml::to_string_pretty(config).expect("failed to serialize test config");
        Self::with_toml(&content)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A path in the same temp directory, for sibling files such as JSON
    /// metadata dumps.
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}
