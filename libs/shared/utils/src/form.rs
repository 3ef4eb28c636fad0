use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use tracing::debug;

use shared_integrations::UploadedImage;
use shared_models::error::AppError;

/// Body limit for routes taking an image part.
pub const FORM_BODY_LIMIT: usize = 5 * 1024 * 1024;

/// Text fields and the optional `image` file part of a multipart form.
#[derive(Debug, Default)]
pub struct FormData {
    pub(crate) fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::ValidationError(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::ValidationError(e.body_text()))?;

                // Browsers send an empty part when no file was picked.
                if !bytes.is_empty() {
                    debug!("Received image part ({} bytes, {})", bytes.len(), content_type);
                    form.image = Some(UploadedImage {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::ValidationError(e.body_text()))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Trimmed value, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::ValidationError(e.body_text()))?;
        Self::from_multipart(multipart).await
    }
}
