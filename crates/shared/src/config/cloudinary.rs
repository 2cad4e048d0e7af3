//! Image hosting on Cloudinary via signed uploads.

use crate::{abstract_trait::ImageUploaderTrait, domain::requests::ImageFile, errors::ServiceError};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{error, info};

#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Cloudinary {
    config: CloudinaryConfig,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl Cloudinary {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }

    /// Signs the sorted upload parameters followed by the API secret.
    fn sign(&self, timestamp: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("timestamp={timestamp}").as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl ImageUploaderTrait for Cloudinary {
    async fn upload(&self, image: &ImageFile) -> Result<String, ServiceError> {
        info!("🖼️ Uploading image {} ({} bytes)", image.file_name, image.bytes.len());

        let timestamp = Utc::now().timestamp();

        let mut part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
        if let Some(content_type) = &image.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| ServiceError::Upload(format!("Invalid content type: {e}")))?;
        }

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", self.sign(timestamp));

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Cloudinary request failed for {}: {e:?}", image.file_name);
                ServiceError::Upload(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!("❌ Cloudinary rejected {}: {status} {text}", image.file_name);

            return Err(ServiceError::Upload(format!(
                "upload failed with status {status}"
            )));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Upload(format!("Unexpected response body: {e}")))?;

        info!("✅ Uploaded {} to {}", image.file_name, parsed.secure_url);
        Ok(parsed.secure_url)
    }
}
