//! Error types for the Recreate image pipeline.
//!
//! `PipelineError` is the closed set of outcomes a request can fail with. Provider
//! adapters translate upstream responses into it, so nothing above the adapter layer
//! ever inspects provider-specific error shapes.

use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised by an [`ImageStore`](crate::store::ImageStore) backend.
///
/// The in-memory store never produces one; the type exists so a persistent
/// backend can report failures that surface as [`PipelineError::StorageFailure`].
#[derive(Error, Debug)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a single image request failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The request did not carry a usable image payload
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upstream reports an exhausted usage quota
    #[error("{provider} quota exceeded: {message}")]
    QuotaExceeded { provider: String, message: String },

    /// Upstream reports too many requests
    #[error("{provider} rate limited: {message}")]
    RateLimited { provider: String, message: String },

    /// Upstream reports a hard billing ceiling
    #[error("{provider} billing limit reached: {message}")]
    BillingLimitReached { provider: String, message: String },

    /// Upstream rejected the model or credentials we are configured with
    #[error("{provider} misconfigured: {message}")]
    ServiceMisconfigured { provider: String, message: String },

    /// Upstream answered successfully but the result was empty or unusable
    #[error("{stage} produced no usable result: {message}")]
    GenerationFailure { stage: Stage, message: String },

    /// Persisting the finished record failed
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// Anything that could not be classified (transport errors, timeouts, ...)
    #[error("Unclassified failure: {0}")]
    Unknown(String),
}

/// Pipeline stage that talks to an external service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Describe,
    Generate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Describe => f.write_str("describe"),
            Stage::Generate => f.write_str("generate"),
        }
    }
}

impl PipelineError {
    /// Message that is safe to show to the end user.
    ///
    /// Upstream detail stays in the logs; the client only ever sees one of these.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::InvalidInput(message) => message.clone(),
            PipelineError::QuotaExceeded { .. } => {
                "API quota exceeded. Please try again later.".to_string()
            }
            PipelineError::RateLimited { .. } => {
                "Too many requests. Please try again later.".to_string()
            }
            PipelineError::BillingLimitReached { .. } => {
                "API billing limit reached. Please try again later.".to_string()
            }
            PipelineError::ServiceMisconfigured { .. } => {
                "API configuration error. Please try again later.".to_string()
            }
            PipelineError::StorageFailure(_) => {
                "Failed to save image. Please try again.".to_string()
            }
            PipelineError::GenerationFailure { .. } | PipelineError::Unknown(_) => {
                "Failed to process image. Please try again.".to_string()
            }
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        PipelineError::StorageFailure(err.message)
    }
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
