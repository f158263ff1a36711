//! HTTP surface consumed by the web and mobile clients.
//!
//! - `POST /api/process-image` runs one photo through the pipeline
//! - `GET /api/images` lists stored records, newest first
//! - `GET /api/images/:id` fetches one record
//! - `GET /api/health` reports version and configured providers

mod error;
mod routes;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use recreate_core::config::ServerConfig;
use recreate_core::ImagePipeline;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ImagePipeline>,
}

impl AppState {
    pub fn new(pipeline: ImagePipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let body_limit = (config.max_body_mb as usize).saturating_mul(1024 * 1024);

    let router = Router::new()
        .route("/api/process-image", post(routes::process_image))
        .route("/api/images", get(routes::list_images))
        .route("/api/images/:id", get(routes::get_image))
        .route("/api/health", get(routes::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use recreate_core::providers::{
        DescribeRequest, Description, GenerateRequest, GeneratedImage, UpstreamError,
    };
    use recreate_core::{
        DescriptionProvider, GenerationProvider, ImageRecord, ImageStore, MemoryStore, NewImage,
        PipelineError, PipelineOptions, PipelineResult, StoreError,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const PAYLOAD: &str = "/9j/4AAQSkZJRgABAQAAAQABAAD/2wBDAAgGBgcGBQgHBwcJCQgKDBQNDAsLDBkSEw8U";

    struct StubDescriber(PipelineResult<String>);

    #[async_trait]
    impl DescriptionProvider for StubDescriber {
        fn name(&self) -> &str {
            "stub-vision"
        }

        fn model(&self) -> &str {
            "stub-vision-1"
        }

        async fn describe(&self, _request: &DescribeRequest) -> PipelineResult<Description> {
            self.0.clone().map(|text| Description {
                text,
                model: "stub-vision-1".to_string(),
                tokens_used: None,
                latency_ms: 1,
            })
        }
    }

    struct StubGenerator(PipelineResult<String>);

    #[async_trait]
    impl GenerationProvider for StubGenerator {
        fn name(&self) -> &str {
            "stub-images"
        }

        fn model(&self) -> &str {
            "stub-images-1"
        }

        async fn generate(&self, _request: &GenerateRequest) -> PipelineResult<GeneratedImage> {
            self.0.clone().map(|url| GeneratedImage {
                url,
                revised_prompt: None,
                model: "stub-images-1".to_string(),
                latency_ms: 1,
            })
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl ImageStore for BrokenStore {
        async fn create(&self, _image: NewImage) -> Result<ImageRecord, StoreError> {
            Err(StoreError::new("unavailable"))
        }

        async fn get(&self, _id: u64) -> Result<Option<ImageRecord>, StoreError> {
            Err(StoreError::new("unavailable"))
        }

        async fn list(&self) -> Result<Vec<ImageRecord>, StoreError> {
            Err(StoreError::new("unavailable"))
        }
    }

    fn app_with(
        describe: PipelineResult<String>,
        generate: PipelineResult<String>,
        store: Arc<dyn ImageStore>,
    ) -> Router {
        let pipeline = ImagePipeline::new(
            Arc::new(StubDescriber(describe)),
            Arc::new(StubGenerator(generate)),
            store,
            PipelineOptions::default(),
        );
        router(AppState::new(pipeline), &ServerConfig::default())
    }

    fn app() -> Router {
        app_with(
            Ok("a mountain at sunset".to_string()),
            Ok("https://x/y.png".to_string()),
            Arc::new(MemoryStore::new()),
        )
    }

    fn failing_describe(err: PipelineError) -> Router {
        app_with(
            Err(err),
            Ok("https://unused".to_string()),
            Arc::new(MemoryStore::new()),
        )
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/process-image")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_process_then_list() {
        let app = app();

        let (status, body) = send(&app, post_json(&json!({ "image": PAYLOAD }).to_string())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(body["originalImage"], PAYLOAD);
        assert_eq!(body["aiDescription"], "a mountain at sunset");
        assert_eq!(body["generatedImage"], "https://x/y.png");
        assert!(body["metadata"]["timestamp"].is_string());

        send(&app, post_json(&json!({ "image": PAYLOAD }).to_string())).await;

        let (status, list) = send(&app, get("/api/images")).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<u64> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_missing_image_is_400() {
        let app = app();
        for body in [json!({}), json!({ "image": "" }), json!({ "image": null })] {
            let (status, body) = send(&app, post_json(&body.to_string())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Image is required");
        }
        let (_, list) = send(&app, get("/api/images")).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected_with_json_error() {
        let app = app();
        let (status, body) = send(&app, post_json("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_upstream_errors_map_to_statuses() {
        let cases = [
            (Some(429), Some("insufficient_quota"), None, StatusCode::PAYMENT_REQUIRED),
            (Some(429), None, None, StatusCode::TOO_MANY_REQUESTS),
            (Some(400), None, Some("billing_hard_limit_reached"), StatusCode::PAYMENT_REQUIRED),
            (Some(404), None, Some("model_not_found"), StatusCode::INTERNAL_SERVER_ERROR),
            (Some(500), Some("server_error"), None, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (status, error_type, code, expected) in cases {
            let err = UpstreamError {
                provider: "openai".to_string(),
                status,
                error_type: error_type.map(String::from),
                code: code.map(String::from),
                message: "upstream detail".to_string(),
            }
            .classify();
            let app = failing_describe(err);

            let (actual, body) =
                send(&app, post_json(&json!({ "image": PAYLOAD }).to_string())).await;
            assert_eq!(actual, expected, "{error_type:?} {code:?}");
            let message = body["error"].as_str().unwrap();
            assert!(!message.contains("upstream detail"));
        }
    }

    #[tokio::test]
    async fn test_unknown_error_message() {
        let app = failing_describe(PipelineError::Unknown("boom".to_string()));
        let (status, body) = send(&app, post_json(&json!({ "image": PAYLOAD }).to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to process image. Please try again.");
    }

    #[tokio::test]
    async fn test_rate_limit_message() {
        let app = failing_describe(PipelineError::RateLimited {
            provider: "openai".to_string(),
            message: "slow down".to_string(),
        });
        let (status, body) = send(&app, post_json(&json!({ "image": PAYLOAD }).to_string())).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "Too many requests. Please try again later.");
    }

    #[tokio::test]
    async fn test_images_rejects_other_methods() {
        let app = app();
        for method in [Method::POST, Method::DELETE, Method::PUT] {
            let request = Request::builder()
                .method(method)
                .uri("/api/images")
                .body(Body::empty())
                .unwrap();
            let (status, _) = send(&app, request).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        }
    }

    #[tokio::test]
    async fn test_get_single_image() {
        let app = app();
        send(&app, post_json(&json!({ "image": PAYLOAD }).to_string())).await;

        let (status, body) = send(&app, get("/api/images/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);

        let (status, body) = send(&app, get("/api/images/42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Image not found");

        let (status, _) = send(&app, get("/api/images/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_failures() {
        let app = app_with(
            Ok("a cat".to_string()),
            Ok("https://x/cat.png".to_string()),
            Arc::new(BrokenStore),
        );

        let (status, body) = send(&app, get("/api/images")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch images");

        let (status, body) = send(&app, post_json(&json!({ "image": PAYLOAD }).to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to save image. Please try again.");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["describer"]["provider"], "stub-vision");
        assert_eq!(body["generator"]["model"], "stub-images-1");
    }
}
