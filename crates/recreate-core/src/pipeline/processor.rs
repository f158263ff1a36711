//! Pipeline orchestration: validate → describe → generate → persist.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::config::Config;
use crate::error::{ConfigError, PipelineError, PipelineResult, Stage};
use crate::providers::{
    DescribeRequest, Description, DescriptionProvider, GenerateRequest, GeneratedImage,
    GenerationProvider, ImageInput, ProviderFactory,
};
use crate::store::ImageStore;
use crate::types::{ImageMetadata, ImageRecord, NewImage, StageInfo};

use super::prompt::{recreation_prompt, DESCRIBE_PROMPT};
use super::validate::Validator;

/// Knobs for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum decoded image size in bytes
    pub max_image_bytes: usize,
    /// Deadline for the description call
    pub describe_timeout: Duration,
    /// Deadline for the generation call
    pub generate_timeout: Duration,
    /// Requested output resolution
    pub image_size: String,
    /// Requested output quality tier
    pub image_quality: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_image_bytes: config.max_image_bytes(),
            describe_timeout: Duration::from_millis(config.pipeline.describe_timeout_ms),
            generate_timeout: Duration::from_millis(config.pipeline.generate_timeout_ms),
            image_size: config.providers.openai.image_size.clone(),
            image_quality: config.providers.openai.image_quality.clone(),
        }
    }
}

/// Turns one uploaded photo into a stored [`ImageRecord`].
///
/// Holds no per-request state, so a single instance serves every request
/// concurrently. Nothing is written to the store unless both external calls
/// succeed.
pub struct ImagePipeline {
    describer: Arc<dyn DescriptionProvider>,
    generator: Arc<dyn GenerationProvider>,
    store: Arc<dyn ImageStore>,
    validator: Validator,
    options: PipelineOptions,
}

impl ImagePipeline {
    pub fn new(
        describer: Arc<dyn DescriptionProvider>,
        generator: Arc<dyn GenerationProvider>,
        store: Arc<dyn ImageStore>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            validator: Validator::with_max_bytes(options.max_image_bytes),
            describer,
            generator,
            store,
            options,
        }
    }

    /// Build the pipeline with the providers selected in `config`.
    pub fn from_config(config: &Config, store: Arc<dyn ImageStore>) -> Result<Self, ConfigError> {
        let describer = ProviderFactory::describer(config)?;
        let generator = ProviderFactory::generator(config)?;
        tracing::info!(
            describer = describer.name(),
            describer_model = describer.model(),
            generator = generator.name(),
            generator_model = generator.model(),
            "Pipeline configured"
        );
        Ok(Self::new(
            describer,
            generator,
            store,
            PipelineOptions::from_config(config),
        ))
    }

    /// The store records are written to.
    pub fn store(&self) -> &Arc<dyn ImageStore> {
        &self.store
    }

    pub fn describer(&self) -> &dyn DescriptionProvider {
        self.describer.as_ref()
    }

    pub fn generator(&self) -> &dyn GenerationProvider {
        self.generator.as_ref()
    }

    /// Run one payload through the full pipeline.
    pub async fn process(&self, payload: &str) -> PipelineResult<ImageRecord> {
        let start = Instant::now();
        let result = self.run(payload).await;

        match &result {
            Ok(record) => tracing::info!(
                id = record.id,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Image recreated"
            ),
            Err(e @ PipelineError::InvalidInput(_)) => tracing::debug!("Rejected input: {e}"),
            Err(e) => tracing::error!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Image processing failed: {e}"
            ),
        }
        result
    }

    async fn run(&self, payload: &str) -> PipelineResult<ImageRecord> {
        let image = self.validator.validate(payload)?;
        tracing::debug!(
            media_type = %image.media_type,
            payload_len = image.data.len(),
            "Validated image payload"
        );

        let description = self.describe(image).await?;
        tracing::debug!("Generated description: {}", description.text);

        let generated = self.generate(&description.text).await?;
        tracing::debug!("Generated image: {}", generated.url);

        let metadata = ImageMetadata {
            timestamp: Utc::now(),
            description: Some(StageInfo {
                provider: self.describer.name().to_string(),
                model: description.model,
                latency_ms: description.latency_ms,
                tokens_used: description.tokens_used,
            }),
            generation: Some(StageInfo {
                provider: self.generator.name().to_string(),
                model: generated.model,
                latency_ms: generated.latency_ms,
                tokens_used: None,
            }),
            revised_prompt: generated.revised_prompt,
        };

        let record = self
            .store
            .create(
                NewImage::new(payload)
                    .with_description(description.text)
                    .with_generated_image(generated.url)
                    .with_metadata(metadata),
            )
            .await?;
        Ok(record)
    }

    async fn describe(&self, image: ImageInput) -> PipelineResult<Description> {
        let request = DescribeRequest {
            image,
            prompt: DESCRIBE_PROMPT.to_string(),
        };
        let description = with_timeout(
            Stage::Describe,
            self.options.describe_timeout,
            self.describer.describe(&request),
        )
        .await?;

        if description.text.trim().is_empty() {
            return Err(PipelineError::GenerationFailure {
                stage: Stage::Describe,
                message: format!("{} returned an empty description", self.describer.name()),
            });
        }
        Ok(description)
    }

    async fn generate(&self, description: &str) -> PipelineResult<GeneratedImage> {
        let request = GenerateRequest {
            prompt: recreation_prompt(description),
            n: 1,
            size: self.options.image_size.clone(),
            quality: self.options.image_quality.clone(),
        };
        let generated = with_timeout(
            Stage::Generate,
            self.options.generate_timeout,
            self.generator.generate(&request),
        )
        .await?;

        if generated.url.trim().is_empty() {
            return Err(PipelineError::GenerationFailure {
                stage: Stage::Generate,
                message: format!("{} returned no image URL", self.generator.name()),
            });
        }
        Ok(generated)
    }
}

/// Bound an external call. Expiry is not a classified upstream condition, so it
/// lands in `Unknown`.
async fn with_timeout<T, F>(stage: Stage, limit: Duration, call: F) -> PipelineResult<T>
where
    F: Future<Output = PipelineResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(PipelineError::Unknown(format!(
            "{stage} timed out after {}ms",
            limit.as_millis()
        ))),
    }
}
