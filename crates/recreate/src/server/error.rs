//! Conversion of pipeline outcomes into HTTP responses.
//!
//! Every failure leaves the server as a status code plus `{"error": "..."}`.
//! Upstream detail is logged by the pipeline and never echoed to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recreate_core::{PipelineError, StoreError};
use serde_json::json;

/// Errors a route handler can return.
#[derive(Debug)]
pub enum ApiError {
    /// The pipeline failed with a classified error
    Pipeline(PipelineError),
    /// The request could not be parsed at all
    Rejected { status: StatusCode, message: String },
    /// A lookup found nothing
    NotFound(&'static str),
    /// Reading from the store failed
    ReadFailed(StoreError),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::Pipeline(err)
    }
}

/// HTTP status for each pipeline error kind.
pub fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PipelineError::QuotaExceeded { .. } | PipelineError::BillingLimitReached { .. } => {
            StatusCode::PAYMENT_REQUIRED
        }
        PipelineError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        PipelineError::ServiceMisconfigured { .. }
        | PipelineError::GenerationFailure { .. }
        | PipelineError::StorageFailure(_)
        | PipelineError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Pipeline(err) => (status_for(&err), err.user_message()),
            ApiError::Rejected { status, message } => (status, message),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ApiError::ReadFailed(err) => {
                tracing::error!("Error fetching images: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch images".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
