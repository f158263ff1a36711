//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

/// Description providers the factory knows how to build.
pub const DESCRIPTION_PROVIDERS: &[&str] = &["openai", "anthropic"];

/// Generation providers the factory knows how to build.
pub const GENERATION_PROVIDERS: &[&str] = &["openai"];

const DALLE3_SIZES: &[&str] = &["1024x1024", "1792x1024", "1024x1792"];
const DALLE2_SIZES: &[&str] = &["256x256", "512x512", "1024x1024"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.server.max_body_mb == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_body_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_size_mb must be > 0".into(),
            ));
        }
        if self.pipeline.describe_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.describe_timeout_ms must be > 0".into(),
            ));
        }
        if self.pipeline.generate_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.generate_timeout_ms must be > 0".into(),
            ));
        }
        if !DESCRIPTION_PROVIDERS.contains(&self.pipeline.description_provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "pipeline.description_provider must be one of {}, got '{}'",
                DESCRIPTION_PROVIDERS.join(", "),
                self.pipeline.description_provider
            )));
        }
        if !GENERATION_PROVIDERS.contains(&self.pipeline.generation_provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "pipeline.generation_provider must be one of {}, got '{}'",
                GENERATION_PROVIDERS.join(", "),
                self.pipeline.generation_provider
            )));
        }

        let openai = &self.providers.openai;
        let sizes = if openai.image_model == "dall-e-2" {
            DALLE2_SIZES
        } else {
            DALLE3_SIZES
        };
        if !sizes.contains(&openai.image_size.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "providers.openai.image_size '{}' is not supported by {}",
                openai.image_size, openai.image_model
            )));
        }
        if openai.max_tokens == 0 || self.providers.anthropic.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "providers.*.max_tokens must be > 0".into(),
            ));
        }
        Ok(())
    }
}
