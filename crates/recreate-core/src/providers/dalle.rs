//! OpenAI image generation provider (DALL-E 2 / DALL-E 3).

use super::provider::{GenerateRequest, GeneratedImage, GenerationProvider};
use super::upstream::{read_json, transport_error};
use crate::error::{PipelineError, PipelineResult, Stage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Image generation via `POST /images/generations`.
pub struct DalleGenerator {
    api_key: String,
    model: String,
    client: reqwest::Client,
    endpoint: String,
}

impl DalleGenerator {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: "https://api.openai.com/v1/images/generations".to_string(),
        }
    }

    /// Point at a different API base.
    pub fn with_endpoint(mut self, base_url: &str) -> Self {
        self.endpoint = format!("{}/images/generations", base_url.trim_end_matches('/'));
        self
    }

    /// dall-e-2 rejects the `quality` parameter.
    fn supports_quality(&self) -> bool {
        self.model != "dall-e-2"
    }
}

#[derive(Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<&'a str>,
}

#[derive(Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

#[async_trait]
impl GenerationProvider for DalleGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerateRequest) -> PipelineResult<GeneratedImage> {
        let start = Instant::now();

        let body = ImagesRequest {
            model: &self.model,
            prompt: &request.prompt,
            n: request.n,
            size: &request.size,
            quality: self
                .supports_quality()
                .then_some(request.quality.as_str()),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(self.name(), e))?;

        let images: ImagesResponse = read_json(self.name(), Stage::Generate, resp).await?;

        let first = images.data.into_iter().next();
        let revised_prompt = first.as_ref().and_then(|d| d.revised_prompt.clone());
        let url = first
            .and_then(|d| d.url)
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| PipelineError::GenerationFailure {
                stage: Stage::Generate,
                message: "OpenAI returned no image URL".to_string(),
            })?;

        Ok(GeneratedImage {
            url,
            revised_prompt,
            model: self.model.clone(),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
