//! Image hosting for gym logos and profile photos.
//!
//! Uploads go to Cloudinary as signed multipart requests. When credentials
//! are not configured the server runs with [`DisabledImageStore`], which
//! rejects every upload.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use gymdesk_core::errors::{GymError, GymResult};

use crate::config::CloudinaryConfig;

/// Maximum upload size (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// A validated image ready for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub extension: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Checks size and extension of an uploaded file.
    pub fn new(file_name: Option<&str>, bytes: Vec<u8>) -> GymResult<Self> {
        if bytes.is_empty() {
            return Err(GymError::Validation("Empty file".to_string()));
        }
        if bytes.len() > MAX_IMAGE_SIZE {
            return Err(GymError::Validation(format!(
                "File too large: {} bytes (max {})",
                bytes.len(),
                MAX_IMAGE_SIZE
            )));
        }

        let file_name = file_name.unwrap_or_default().to_string();
        let extension = std::path::Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_FORMATS.contains(&extension.as_str()) {
            return Err(GymError::Validation(format!(
                "Unsupported format: {extension}. Supported: png, jpg, jpeg, webp"
            )));
        }

        Ok(Self {
            file_name,
            extension,
            bytes,
        })
    }
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores the image under `folder` and returns its public URL.
    async fn upload(&self, folder: &str, image: ImageUpload) -> GymResult<String>;
}

pub struct DisabledImageStore;

#[async_trait]
impl ImageStore for DisabledImageStore {
    async fn upload(&self, _folder: &str, _image: ImageUpload) -> GymResult<String> {
        Err(GymError::Validation(
            "Image uploads are not configured on this server".to_string(),
        ))
    }
}

pub struct CloudinaryImageStore {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryImageStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }
}

/// String signed for an upload: the parameters sorted by name and joined
/// as `k=v&k=v`, immediately followed by the API secret.
pub fn signature_payload(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{joined}{api_secret}")
}

pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    hex::encode(Sha256::digest(signature_payload(params, api_secret).as_bytes()))
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload(&self, folder: &str, image: ImageUpload) -> GymResult<String> {
        let timestamp = Utc::now().timestamp().to_string();
        let params = [("folder", folder.to_string()), ("timestamp", timestamp.clone())];
        let signature = sign(&params, &self.config.api_secret);

        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&format!("image/{}", mime_subtype(&image.extension)))
            .map_err(|e| GymError::Internal(Box::new(e)))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let resp = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| GymError::Internal(Box::new(e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("Image upload failed ({}): {}", status, text);
            return Err(GymError::Internal(
                format!("Image upload failed with status {}", status).into(),
            ));
        }

        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| GymError::Internal(Box::new(e)))?;

        tracing::info!("Uploaded image to {}", body.secure_url);
        Ok(body.secure_url)
    }
}

fn mime_subtype(extension: &str) -> &str {
    match extension {
        "jpg" => "jpeg",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_payload_sorts_params() {
        let params = [
            ("timestamp", "1700000000".to_string()),
            ("folder", "gym".to_string()),
        ];
        assert_eq!(
            signature_payload(&params, "secret"),
            "folder=gym&timestamp=1700000000secret"
        );
        assert_eq!(sign(&params, "secret").len(), 64);
    }

    #[test]
    fn rejects_unsupported_extension() {
        let err = ImageUpload::new(Some("logo.gif"), vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, GymError::Validation(_)));
    }

    #[test]
    fn rejects_oversized_file() {
        let err = ImageUpload::new(Some("logo.png"), vec![0; MAX_IMAGE_SIZE + 1]).unwrap_err();
        assert!(matches!(err, GymError::Validation(_)));
    }

    #[test]
    fn accepts_uppercase_extension() {
        let upload = ImageUpload::new(Some("LOGO.JPG"), vec![0; 16]).unwrap();
        assert_eq!(upload.extension, "jpg");
    }
}
