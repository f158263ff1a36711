//! OpenAI description provider using the Chat Completions API.
//!
//! Sends the prompt and the image (as a data URL) in one user message.

use super::provider::{DescribeRequest, Description, DescriptionProvider};
use super::upstream::{read_json, transport_error};
use crate::error::{PipelineError, PipelineResult, Stage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// OpenAI vision provider using Chat Completions API.
pub struct OpenAiDescriber {
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiDescriber {
    pub fn new(api_key: &str, model: &str, max_tokens: u32) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
            client: reqwest::Client::new(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }

    /// Point at a different API base (e.g. a proxy or an OpenAI-compatible host).
    pub fn with_endpoint(mut self, base_url: &str) -> Self {
        self.endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        self
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[async_trait]
impl DescriptionProvider for OpenAiDescriber {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn describe(&self, request: &DescribeRequest) -> PipelineResult<Description> {
        let start = Instant::now();

        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text {
                        text: request.prompt.clone(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                        },
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(self.name(), e))?;

        let chat_resp: ChatResponse = read_json(self.name(), Stage::Describe, resp).await?;

        let text = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PipelineError::GenerationFailure {
                stage: Stage::Describe,
                message: "OpenAI returned no description content".to_string(),
            })?;

        Ok(Description {
            text,
            model: chat_resp.model,
            tokens_used: chat_resp.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
