//! Anthropic description provider using the Messages API.
//!
//! Sends image + prompt with a base64 image content block.

use super::provider::{DescribeRequest, Description, DescriptionProvider};
use super::upstream::{read_json, transport_error};
use crate::error::{PipelineError, PipelineResult, Stage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Anthropic vision provider.
pub struct AnthropicDescriber {
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
    endpoint: String,
}

impl AnthropicDescriber {
    pub fn new(api_key: &str, model: &str, max_tokens: u32) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
            client: reqwest::Client::new(),
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
        }
    }

    /// Point at a different API base.
    pub fn with_endpoint(mut self, base_url: &str) -> Self {
        self.endpoint = format!("{}/messages", base_url.trim_end_matches('/'));
        self
    }
}

// --- Request types ---

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "image")]
    Image { source: ImageSource },
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: String,
    media_type: String,
    data: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseContent>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ResponseContent {
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[async_trait]
impl DescriptionProvider for AnthropicDescriber {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn describe(&self, request: &DescribeRequest) -> PipelineResult<Description> {
        let start = Instant::now();

        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64".to_string(),
                            media_type: request.image.media_type.clone(),
                            data: request.image.data.clone(),
                        },
                    },
                    ContentBlock::Text {
                        text: request.prompt.clone(),
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(self.name(), e))?;

        let messages_resp: MessagesResponse =
            read_json(self.name(), Stage::Describe, resp).await?;

        let text = messages_resp
            .content
            .into_iter()
            .filter_map(|c| c.text)
            .collect::<Vec<_>>()
            .join("");

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(PipelineError::GenerationFailure {
                stage: Stage::Describe,
                message: "Anthropic returned no text content".to_string(),
            });
        }

        Ok(Description {
            text,
            model: messages_resp.model,
            tokens_used: messages_resp
                .usage
                .map(|u| u.input_tokens + u.output_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
