pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::RelayConfig;
use crate::services::inference::{HttpInferenceBackend, InferenceBackend};
use crate::services::intake::UploadIntake;
use crate::services::relay::InferenceRelay;
use crate::services::staging::StagingArea;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Slack on top of the upload budget for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::predict::predict,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            models::PredictionResult,
            models::ErrorResponse,
            models::HealthResponse,
        )
    ),
    tags(
        (name = "predict", description = "Image classification relay"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: RelayConfig,
    pub intake: Arc<UploadIntake>,
    pub relay: Arc<InferenceRelay>,
}

impl AppState {
    pub fn new(config: RelayConfig, backend: Arc<dyn InferenceBackend>) -> Self {
        let staging = StagingArea::new(config.staging_dir.clone());
        Self {
            intake: Arc::new(UploadIntake::new(staging)),
            relay: Arc::new(InferenceRelay::new(backend)),
            config,
        }
    }

    /// State wired to the HTTP backend named in `config`.
    pub fn from_config(config: RelayConfig) -> Self {
        let backend = Arc::new(HttpInferenceBackend::new(config.backend_url.clone()));
        Self::new(config, backend)
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_size + MULTIPART_OVERHEAD;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/predict", post(api::handlers::predict::predict))
        .route("/api/predict", post(api::handlers::predict::predict))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
        .layer(from_fn(api::middleware::metrics::metrics_middleware))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .with_state(state)
}
