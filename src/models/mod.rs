use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Content type declared for every image forwarded to the backend.
pub const FORWARDED_CONTENT_TYPE: &str = "image/*";

/// Filename label attached to every image forwarded to the backend.
pub const FORWARDED_FILE_NAME: &str = "image.jpg";

/// Successful classification, passed through verbatim from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PredictionResult {
    pub prediction: String,
}

/// Outbound request body for the inference backend.
#[derive(Debug, Clone)]
pub struct InferenceRequestPayload {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: &'static str,
}

impl InferenceRequestPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: FORWARDED_CONTENT_TYPE,
            file_name: FORWARDED_FILE_NAME,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub backend_status: String,
    pub version: String,
}
