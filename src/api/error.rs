use crate::models::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

const UNKNOWN_ERROR: &str = "unknown error";

#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or unreadable multipart body
    #[error("Failed to parse form data: {0}")]
    Parse(String),

    /// No part made it through the acceptance filter under the image field
    #[error("No image file provided")]
    MissingImage,

    /// Backend reachable but answered with a non-success status
    #[error("Backend prediction failed ({status}): {body}")]
    Backend { status: StatusCode, body: String },

    /// Local I/O, transport or unexpected payload failure
    #[error("Prediction failed: {0}")]
    Relay(String),
}

impl AppError {
    pub fn relay(detail: impl ToString) -> Self {
        let detail = detail.to_string();
        if detail.trim().is_empty() {
            AppError::Relay(UNKNOWN_ERROR.to_string())
        } else {
            AppError::Relay(detail)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Parse(_) | AppError::MissingImage => StatusCode::BAD_REQUEST,
            AppError::Backend { status, .. } => *status,
            AppError::Relay(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::relay(e)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::relay(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Parse(detail) => {
                tracing::warn!("Form parsing error: {}", detail);
                ErrorResponse {
                    error: "Failed to parse form data".to_string(),
                    details: None,
                }
            }
            AppError::MissingImage => ErrorResponse {
                error: "No image file provided".to_string(),
                details: None,
            },
            AppError::Backend { body, .. } => ErrorResponse {
                error: "Backend prediction failed".to_string(),
                details: Some(body),
            },
            AppError::Relay(detail) => {
                tracing::error!("Prediction error: {}", detail);
                ErrorResponse {
                    error: "Prediction failed".to_string(),
                    details: Some(detail),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
