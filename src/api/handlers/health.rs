use crate::AppState;
use crate::models::HealthResponse;
use axum::{Json, extract::State, response::IntoResponse};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Relay health and backend reachability", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.relay.backend();

    let backend_status = if backend.health_check().await {
        "reachable"
    } else {
        "unreachable"
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        backend: backend.base_url().to_string(),
        backend_status: backend_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
