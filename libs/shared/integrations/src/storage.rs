use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::error::GatewayError;

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/") && !self.bytes.is_empty()
    }

    fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores the image under `folder` and returns its public URL.
    async fn upload(&self, folder: &str, image: UploadedImage) -> Result<String, GatewayError>;
}

/// Supabase Storage bucket holding profile images.
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
            bucket: config.storage_bucket.clone(),
        }
    }

    pub fn public_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, object_path
        )
    }
}

#[async_trait]
impl ImageStore for SupabaseStorage {
    async fn upload(&self, folder: &str, image: UploadedImage) -> Result<String, GatewayError> {
        if self.base_url.is_empty() || self.service_key.is_empty() || self.bucket.is_empty() {
            return Err(GatewayError::NotConfigured("Image storage"));
        }

        let object_path = format!("{}/{}.{}", folder, Uuid::new_v4(), image.extension());
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, object_path
        );
        debug!("Uploading {} bytes to {}", image.bytes.len(), url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Content-Type", image.content_type.as_str())
            .header("x-upsert", "false")
            .body(image.bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            error!("Image upload failed: {} - {}", status, message);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(self.public_url(&object_path))
    }
}
