use crate::AppState;
use crate::api::error::AppError;
use crate::models::{ErrorResponse, PredictionResult};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};

#[utoipa::path(
    post,
    path = "/predict",
    request_body(content = Multipart, description = "Image under the `image` field", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Prediction from the inference backend", body = PredictionResult),
        (status = 400, description = "Unparseable form or no acceptable image", body = ErrorResponse),
        (status = 500, description = "Relay failure", body = ErrorResponse),
        (status = "default", description = "Backend rejection, relayed with the backend's status", body = ErrorResponse)
    ),
    tag = "predict"
)]
pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictionResult>, AppError> {
    let multipart = multipart.map_err(|e| AppError::Parse(e.body_text()))?;

    let staged = state.intake.receive(multipart).await?;
    let result = state.relay.forward(staged).await?;

    Ok(Json(result))
}
