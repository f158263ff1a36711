//! Provider traits and request/response types.
//!
//! A pipeline is built from one [`DescriptionProvider`] and one
//! [`GenerationProvider`]. [`ProviderFactory`] picks the implementations named in
//! the config.

use crate::config::Config;
use crate::error::{ConfigError, PipelineResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Base64-encoded image ready to send to a vision API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Base64-encoded image bytes, without any data-URL prefix
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    pub fn new(data: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A request to describe an image.
#[derive(Debug, Clone)]
pub struct DescribeRequest {
    /// The image to describe
    pub image: ImageInput,
    /// Instruction text for the model
    pub prompt: String,
}

/// Text returned by a description provider.
#[derive(Debug, Clone)]
pub struct Description {
    /// Generated description, trimmed
    pub text: String,
    /// Model identifier reported by the provider
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// A request to synthesize an image from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Text prompt for the image model
    pub prompt: String,
    /// Number of images to generate
    pub n: u8,
    /// Output resolution, e.g. "1024x1024"
    pub size: String,
    /// Quality tier, e.g. "standard"
    pub quality: String,
}

/// Reference to a generated image.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Where the generated image can be fetched
    pub url: String,
    /// Prompt as rewritten by the model, if reported
    pub revised_prompt: Option<String>,
    /// Model identifier used
    pub model: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Converts an image into a textual description.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the pipeline holds `Arc<dyn DescriptionProvider>`).
#[async_trait]
pub trait DescriptionProvider: Send + Sync {
    /// Provider name for logging (e.g., "openai", "anthropic").
    fn name(&self) -> &str;

    /// Configured model name.
    fn model(&self) -> &str;

    /// Describe the image. Failures are already classified.
    async fn describe(&self, request: &DescribeRequest) -> PipelineResult<Description>;
}

/// Converts a text prompt into a newly generated image.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Configured model name.
    fn model(&self) -> &str;

    /// Generate an image. Failures are already classified.
    async fn generate(&self, request: &GenerateRequest) -> PipelineResult<GeneratedImage>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the configured providers.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Build the description provider named by `pipeline.description_provider`.
    pub fn describer(config: &Config) -> Result<Arc<dyn DescriptionProvider>, ConfigError> {
        match config.pipeline.description_provider.as_str() {
            "openai" => {
                let cfg = &config.providers.openai;
                let api_key = require_key(&cfg.api_key, "OpenAI", "OPENAI_API_KEY")?;
                Ok(Arc::new(
                    super::openai::OpenAiDescriber::new(&api_key, &cfg.vision_model, cfg.max_tokens)
                        .with_endpoint(&cfg.endpoint),
                ))
            }
            "anthropic" => {
                let cfg = &config.providers.anthropic;
                let api_key = require_key(&cfg.api_key, "Anthropic", "ANTHROPIC_API_KEY")?;
                Ok(Arc::new(
                    super::anthropic::AnthropicDescriber::new(&api_key, &cfg.model, cfg.max_tokens)
                        .with_endpoint(&cfg.endpoint),
                ))
            }
            other => Err(ConfigError::ValidationError(format!(
                "Unknown description provider: {other}"
            ))),
        }
    }

    /// Build the generation provider named by `pipeline.generation_provider`.
    pub fn generator(config: &Config) -> Result<Arc<dyn GenerationProvider>, ConfigError> {
        match config.pipeline.generation_provider.as_str() {
            "openai" => {
                let cfg = &config.providers.openai;
                let api_key = require_key(&cfg.api_key, "OpenAI", "OPENAI_API_KEY")?;
                Ok(Arc::new(
                    super::dalle::DalleGenerator::new(&api_key, &cfg.image_model)
                        .with_endpoint(&cfg.endpoint),
                ))
            }
            other => Err(ConfigError::ValidationError(format!(
                "Unknown generation provider: {other}"
            ))),
        }
    }
}

fn require_key(raw: &str, label: &str, env_var: &str) -> Result<String, ConfigError> {
    resolve_env_var(raw).ok_or_else(|| {
        ConfigError::ValidationError(format!("{label} API key not set. Set {env_var} env var."))
    })
}
