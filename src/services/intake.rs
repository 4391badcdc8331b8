use crate::api::error::AppError;
use crate::services::staging::{StagedFile, StagingArea};
use crate::utils::validation::check_image_part;
use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};

/// Multipart field the browser sends the picture under.
pub const IMAGE_FIELD: &str = "image";

/// Descriptor of one file part before acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingUpload {
    pub field_name: Option<String>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl IncomingUpload {
    fn from_field(field: &Field<'_>) -> Self {
        Self {
            field_name: field.name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            file_name: field.file_name().map(str::to_string),
        }
    }

    fn is_file(&self) -> bool {
        self.file_name.is_some()
    }

    fn is_image_field(&self) -> bool {
        self.field_name.as_deref() == Some(IMAGE_FIELD)
    }
}

/// Turns a multipart body into exactly one staged image.
pub struct UploadIntake {
    staging: StagingArea,
}

impl UploadIntake {
    pub fn new(staging: StagingArea) -> Self {
        Self { staging }
    }

    /// Parses the whole body, staging the first accepted file under [`IMAGE_FIELD`].
    ///
    /// Rejected parts are skipped without touching disk. The body is read to
    /// the end before returning, so a malformed tail still fails the request
    /// (and drops anything already staged).
    pub async fn receive(&self, mut multipart: Multipart) -> Result<StagedFile, AppError> {
        let mut staged: Option<StagedFile> = None;

        while let Some(mut field) = multipart.next_field().await.map_err(parse_error)? {
            let upload = IncomingUpload::from_field(&field);
            if !upload.is_file() {
                continue;
            }

            let extension = match check_image_part(
                upload.content_type.as_deref(),
                upload.file_name.as_deref(),
            ) {
                Ok(ext) => ext,
                Err(reason) => {
                    tracing::debug!(
                        field = ?upload.field_name,
                        "Dropping upload part: {}",
                        reason
                    );
                    continue;
                }
            };

            if !upload.is_image_field() || staged.is_some() {
                tracing::debug!(field = ?upload.field_name, "Ignoring extra file part");
                continue;
            }

            let mut slot = self.staging.acquire(extension).await?;
            while let Some(chunk) = field.chunk().await.map_err(parse_error)? {
                slot.write_chunk(&chunk).await?;
            }
            let file = slot.finish(upload.content_type).await?;

            tracing::info!(
                "Image uploaded to: {} ({} bytes)",
                file.path().display(),
                file.size()
            );
            staged = Some(file);
        }

        staged.ok_or(AppError::MissingImage)
    }
}

fn parse_error(e: MultipartError) -> AppError {
    AppError::Parse(e.body_text())
}
