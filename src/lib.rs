pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod widget;

use crate::config::AppConfig;
use crate::services::ingestion::IngestionWorkflow;
use crate::services::storage::StorageService;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::transcribe::transcribe,
        api::handlers::transcripts::get_file,
        api::handlers::transcripts::get_transcript,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::transcribe::TranscribeUpload,
            api::handlers::health::HealthResponse,
            models::transcript::TranscriptPayload,
            models::transcript::TranscriptResults,
            models::transcript::TranscriptText,
        )
    ),
    tags(
        (name = "transcription", description = "Upload, transcribe and fetch transcripts"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Process-wide dependencies, built once in `main` and shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Bucket receiving uploads and transcription output
    pub storage: Arc<dyn StorageService>,
    /// Bucket read by the retrieval endpoints
    pub results: Arc<dyn StorageService>,
    pub ingestion: Arc<IngestionWorkflow>,
    pub config: AppConfig,
    /// Cancelled on shutdown; in-flight polling loops stop on it
    pub shutdown: CancellationToken,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::widget::upload_page))
        .route("/health", get(api::handlers::health::health_check))
        .route("/transcribe", post(api::handlers::transcribe::transcribe))
        .route("/get-file", get(api::handlers::transcripts::get_file))
        .route(
            "/transcripts/:key",
            get(api::handlers::transcripts::get_transcript),
        )
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(
            state
                .config
                .max_file_size
                .saturating_add(10 * 1024 * 1024), // Add 10MB buffer for multipart overhead
        ))
        .with_state(state)
}
