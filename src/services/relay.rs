use crate::api::error::AppError;
use crate::models::{InferenceRequestPayload, PredictionResult};
use crate::services::inference::InferenceBackend;
use crate::services::staging::StagedFile;
use std::sync::Arc;

/// Forwards a staged upload to the backend, reclaiming the file first.
pub struct InferenceRelay {
    backend: Arc<dyn InferenceBackend>,
}

impl InferenceRelay {
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn InferenceBackend> {
        &self.backend
    }

    /// Exactly one read, one delete and one backend call per upload; no retries.
    pub async fn forward(&self, staged: StagedFile) -> Result<PredictionResult, AppError> {
        let bytes = staged.read_and_release().await?;
        let payload = InferenceRequestPayload::new(bytes);

        self.backend.predict(payload).await
    }
}
