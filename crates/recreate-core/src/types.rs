//! Core data types for the Recreate pipeline.
//!
//! `ImageRecord` is the only persisted entity: the original photo, what the vision
//! model saw in it, and the image that was generated from that description.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully processed image as stored and served to clients.
///
/// Field names serialize in camelCase and absent optionals as `null`, which is
/// the shape the gallery UI consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Store-assigned identifier, strictly increasing, never reused
    pub id: u64,

    /// Base64 payload of the source photo exactly as received
    pub original_image: String,

    /// Text produced by the description provider
    pub ai_description: Option<String>,

    /// URL of the recreated image produced by the generation provider
    pub generated_image: Option<String>,

    /// Processing details
    pub metadata: Option<ImageMetadata>,
}

/// Input to [`ImageStore::create`](crate::store::ImageStore::create).
#[derive(Debug, Clone, Default)]
pub struct NewImage {
    pub original_image: String,
    pub ai_description: Option<String>,
    pub generated_image: Option<String>,
    pub metadata: Option<ImageMetadata>,
}

impl NewImage {
    pub fn new(original_image: impl Into<String>) -> Self {
        Self {
            original_image: original_image.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.ai_description = Some(description.into());
        self
    }

    pub fn with_generated_image(mut self, url: impl Into<String>) -> Self {
        self.generated_image = Some(url.into());
        self
    }

    pub fn with_metadata(mut self, metadata: ImageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata recorded alongside each processed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    /// When processing finished (RFC 3339, UTC)
    pub timestamp: DateTime<Utc>,

    /// Description stage details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<StageInfo>,

    /// Generation stage details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<StageInfo>,

    /// Prompt as rewritten by the image model, if it reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

impl ImageMetadata {
    /// Metadata stamped with the current time and nothing else.
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now(),
            description: None,
            generation: None,
            revised_prompt: None,
        }
    }
}

/// Which provider and model handled a stage, and how long it took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageInfo {
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,

    /// Tokens billed for the call, when the provider reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}
