//! The describe-and-regenerate pipeline.
//!
//! - **validate**: payload checks before any network call
//! - **prompt**: fixed instruction and generation prompts
//! - **processor**: orchestrates one request end to end

pub mod processor;
pub mod prompt;
pub mod validate;

// Re-exports for convenient access
pub use processor::{ImagePipeline, PipelineOptions};
pub use prompt::{recreation_prompt, DESCRIBE_PROMPT};
pub use validate::Validator;
