//! External AI service integration.
//!
//! Adapters for the description step (OpenAI vision, Anthropic) and the
//! generation step (OpenAI images). Every adapter classifies its own failures,
//! so callers only ever see [`PipelineError`](crate::error::PipelineError).

pub(crate) mod anthropic;
pub(crate) mod dalle;
pub(crate) mod openai;
pub(crate) mod provider;
pub(crate) mod upstream;

pub use anthropic::AnthropicDescriber;
pub use dalle::DalleGenerator;
pub use openai::OpenAiDescriber;
pub use provider::{
    resolve_env_var, DescribeRequest, Description, DescriptionProvider, GenerateRequest,
    GeneratedImage, GenerationProvider, ImageInput, ProviderFactory,
};
pub use upstream::UpstreamError;
