use crate::api::error::AppError;
use crate::models::{InferenceRequestPayload, PredictionResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Remote classifier the relay forwards images to.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Sends one image and maps the reply to a result or a relay error.
    async fn predict(&self, payload: InferenceRequestPayload) -> Result<PredictionResult, AppError>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Base address, for diagnostics.
    fn base_url(&self) -> &str;
}

#[derive(Deserialize)]
struct BackendPrediction {
    prediction: String,
}

/// Backend reached over HTTP: `POST {base}/predict` with a `file` part.
pub struct HttpInferenceBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInferenceBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = crate::config::normalize_backend_url(&base_url.into());
        Self { client, base_url }
    }

    fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }
}

#[async_trait]
impl InferenceBackend for HttpInferenceBackend {
    async fn predict(&self, payload: InferenceRequestPayload) -> Result<PredictionResult, AppError> {
        let part = Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(payload.content_type)?;
        let form = Form::new().part("file", part);

        let url = self.predict_url();
        tracing::info!("Sending request to: {}", url);

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            // A body that cannot be read is a transport failure, not a rejection
            let body = response.text().await?;
            tracing::error!("Backend error ({}): {}", status, body);
            return Err(AppError::Backend { status, body });
        }

        let data: BackendPrediction = response
            .json()
            .await
            .map_err(|e| AppError::relay(format!("Invalid backend response: {}", e)))?;
        tracing::info!("Backend response: prediction={}", data.prediction);

        Ok(PredictionResult {
            prediction: data.prediction,
        })
    }

    async fn health_check(&self) -> bool {
        match self.client.get(format!("{}/", self.base_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Backend health check failed: {}", e);
                false
            }
        }
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let backend = HttpInferenceBackend::new("http://localhost:8000//");
        assert_eq!(backend.base_url(), "http://localhost:8000");
        assert_eq!(backend.predict_url(), "http://localhost:8000/predict");
    }
}
