//! Configuration management for Recreate.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a missing file or a partial
//! file both work.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Provider selection and timeouts
    pub pipeline: PipelineConfig,

    /// Input limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Provider credentials and models
    pub providers: ProvidersConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path if given (with `~` expansion), else the default location.
    pub fn load_or_default_path(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(raw) => Self::load_from(&expand_path(raw)),
            None => Self::load(),
        }
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.recreate.recreate/config.toml
    /// - Linux: ~/.config/recreate/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\recreate\config\config.toml
    ///
    /// Falls back to ~/.recreate/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "recreate", "recreate")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".recreate").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Maximum accepted decoded image size in bytes.
    pub fn max_image_bytes(&self) -> usize {
        (self.limits.max_image_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.pipeline.description_provider, "openai");
        assert_eq!(config.providers.openai.image_size, "1024x1024");
        assert_eq!(config.providers.openai.image_quality, "standard");
        assert_eq!(config.max_image_bytes(), 20 * 1024 * 1024);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[pipeline]"));
        assert!(toml.contains("[providers.openai]"));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[pipeline]\ndescription_provider = \"anthropic\"\n\n[server]\nport = 8080"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.pipeline.description_provider, "anthropic");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.pipeline.generation_provider, "openai");
        assert_eq!(config.providers.openai.vision_model, "gpt-4o");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[pipeline]\ndescribe_timeout_ms = 0").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_default_toml_round_trips() {
        let toml = Config::default().to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert!(parsed.validate().is_ok());
    }
}
