//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allow cross-origin requests (needed by the mobile shells)
    pub cors: bool,

    /// Maximum request body size in megabytes
    pub max_body_mb: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors: true,
            max_body_mb: 50,
        }
    }
}

/// Provider selection and per-call timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Which provider describes the photo ("openai" or "anthropic")
    pub description_provider: String,

    /// Which provider generates the new image ("openai")
    pub generation_provider: String,

    /// Description call timeout in milliseconds
    pub describe_timeout_ms: u64,

    /// Generation call timeout in milliseconds
    pub generate_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            description_provider: "openai".to_string(),
            generation_provider: "openai".to_string(),
            describe_timeout_ms: 60_000,
            generate_timeout_ms: 120_000,
        }
    }
}

/// Limits on incoming payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum decoded image size in megabytes
    pub max_image_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_image_size_mb: 20,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Credentials and models for every supported provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub openai: OpenAiConfig,
    pub anthropic: AnthropicConfig,
}

/// OpenAI settings, shared by the vision and image endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key (supports `${ENV_VAR}` syntax)
    pub api_key: String,

    /// API base URL
    pub endpoint: String,

    /// Chat model used to describe photos
    pub vision_model: String,

    /// Image model used to recreate photos ("dall-e-3" or "dall-e-2")
    pub image_model: String,

    /// Token ceiling for the description
    pub max_tokens: u32,

    /// Generated image resolution
    pub image_size: String,

    /// Generated image quality tier (dall-e-3 only)
    pub image_quality: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
            vision_model: "gpt-4o".to_string(),
            image_model: "dall-e-3".to_string(),
            max_tokens: 1000,
            image_size: "1024x1024".to_string(),
            image_quality: "standard".to_string(),
        }
    }
}

/// Anthropic settings (description only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    /// API key (supports `${ENV_VAR}` syntax)
    pub api_key: String,

    /// API base URL
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Token ceiling for the description
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: "${ANTHROPIC_API_KEY}".to_string(),
            endpoint: "https://api.anthropic.com/v1".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 1000,
        }
    }
}
