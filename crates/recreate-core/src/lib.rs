//! Recreate Core - describe a photo, then regenerate it.
//!
//! A photo goes to a vision model for a detailed description; the description
//! goes to an image model, and the result is stored alongside the original.
//!
//! # Architecture
//!
//! ```text
//! base64 photo → Validate → Describe (vision) → Generate (image) → ImageStore → ImageRecord
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use recreate_core::{Config, ImagePipeline, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let pipeline = ImagePipeline::from_config(&config, Arc::new(MemoryStore::new()))?;
//!
//!     let record = pipeline.process(&base64_photo).await?;
//!     println!("Recreated as {:?}", record.generated_image);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod store;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult, Stage, StoreError};
pub use pipeline::{ImagePipeline, PipelineOptions};
pub use providers::{DescriptionProvider, GenerationProvider, ProviderFactory};
pub use store::{ImageStore, MemoryStore};
pub use types::{ImageMetadata, ImageRecord, NewImage, StageInfo};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
