//! Route handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use recreate_core::{ImageRecord, VERSION};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;

/// Body of `POST /api/process-image`.
#[derive(Debug, Deserialize)]
pub struct ProcessImageRequest {
    /// Base64 photo, with or without a data-URL prefix
    #[serde(default)]
    pub image: Option<String>,
}

/// `POST /api/process-image`
pub async fn process_image(
    State(state): State<AppState>,
    body: Result<Json<ProcessImageRequest>, JsonRejection>,
) -> Result<Json<ImageRecord>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    })?;

    let image = request.image.unwrap_or_default();
    tracing::info!(payload_len = image.len(), "Starting image processing");

    let record = state.pipeline.process(&image).await?;
    Ok(Json(record))
}

/// `GET /api/images`
pub async fn list_images(State(state): State<AppState>) -> Result<Json<Vec<ImageRecord>>, ApiError> {
    let images = state
        .pipeline
        .store()
        .list()
        .await
        .map_err(ApiError::ReadFailed)?;
    Ok(Json(images))
}

/// `GET /api/images/:id`
pub async fn get_image(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<ImageRecord>, ApiError> {
    let Path(id) = id.map_err(|rejection| ApiError::Rejected {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    state
        .pipeline
        .store()
        .get(id)
        .await
        .map_err(ApiError::ReadFailed)?
        .map(Json)
        .ok_or(ApiError::NotFound("Image"))
}

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    version: &'static str,
    describer: ProviderInfo,
    generator: ProviderInfo,
}

#[derive(Debug, Serialize)]
struct ProviderInfo {
    provider: String,
    model: String,
}

/// `GET /api/health`
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let describer = state.pipeline.describer();
    let generator = state.pipeline.generator();
    Json(Health {
        status: "ok",
        version: VERSION,
        describer: ProviderInfo {
            provider: describer.name().to_string(),
            model: describer.model().to_string(),
        },
        generator: ProviderInfo {
            provider: generator.name().to_string(),
            model: generator.model().to_string(),
        },
    })
}
