//! Unsigned multipart uploads to the asset host.

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use rentadmin_core::config::MediaConfig;

use crate::MediaError;
use crate::file::{MediaFile, validate};

/// Asset host API root.
pub const DEFAULT_UPLOAD_HOST: &str = "https://api.cloudinary.com/v1_1";

/// Where and how to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderConfig {
    /// Upload endpoint.
    pub upload_url: String,
    /// Host account name.
    pub cloud_name: String,
    /// Unsigned upload preset.
    pub upload_preset: String,
    /// Folder used when the caller gives none.
    pub default_folder: String,
}

impl UploaderConfig {
    /// Config for `cloud_name` using the default endpoint.
    #[must_use]
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        let cloud_name = cloud_name.into();
        Self {
            upload_url: format!("{DEFAULT_UPLOAD_HOST}/{cloud_name}/auto/upload"),
            cloud_name,
            upload_preset: upload_preset.into(),
            default_folder: MediaConfig::default().default_folder,
        }
    }

    /// Build from the `media` config section.
    ///
    /// # Errors
    ///
    /// Returns error if the cloud name or upload preset is missing.
    pub fn from_config(config: &MediaConfig) -> Result<Self, MediaError> {
        let cloud_name = config
            .cloud_name
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| MediaError::Config("media.cloudName is not set".to_string()))?;
        let upload_preset = config
            .upload_preset
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| MediaError::Config("media.uploadPreset is not set".to_string()))?;

        let mut uploader = Self::new(cloud_name, upload_preset);
        if let Some(url) = config.upload_url.clone().filter(|v| !v.is_empty()) {
            uploader.upload_url = url;
        }
        uploader.default_folder.clone_from(&config.default_folder);
        Ok(uploader)
    }

    /// Override the endpoint.
    #[must_use]
    pub fn with_upload_url(mut self, url: impl Into<String>) -> Self {
        self.upload_url = url.into();
        self
    }
}

/// What the host returns for a stored asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedAsset {
    /// HTTPS URL of the asset.
    pub secure_url: String,
    /// Host-side id.
    pub public_id: String,
    /// Pixel width (images).
    #[serde(default)]
    pub width: Option<u32>,
    /// Pixel height (images).
    #[serde(default)]
    pub height: Option<u32>,
    /// File format.
    #[serde(default)]
    pub format: Option<String>,
    /// `image`, `raw`, ...
    #[serde(default)]
    pub resource_type: Option<String>,
    /// Stored size.
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// `{success, data?, error?}` outcome of one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Whether the asset was stored.
    pub success: bool,
    /// Stored asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<UploadedAsset>,
    /// Failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    /// Successful upload.
    #[must_use]
    pub fn ok(asset: UploadedAsset) -> Self {
        Self {
            success: true,
            data: Some(asset),
            error: None,
        }
    }

    /// Failed upload.
    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// URL of the stored asset.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.data.as_ref().map(|asset| asset.secure_url.as_str())
    }
}

/// Uploads files to the asset host. No bearer token is involved; the
/// upload preset authorizes the request.
#[derive(Debug, Clone)]
pub struct MediaUploader {
    client: Client,
    config: UploaderConfig,
}

impl MediaUploader {
    /// Create an uploader.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: UploaderConfig) -> Result<Self, MediaError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// Upload `file` into `folder` (or the default folder).
    ///
    /// Never fails: validation, network and host errors all come back as a
    /// failed [`UploadResult`].
    pub async fn upload(&self, file: &MediaFile, folder: Option<&str>) -> UploadResult {
        match self.try_upload(file, folder).await {
            Ok(asset) => {
                tracing::info!(file = %file.file_name, public_id = %asset.public_id, "Upload complete");
                UploadResult::ok(asset)
            }
            Err(e) => {
                tracing::warn!(file = %file.file_name, "Upload failed: {}", e);
                UploadResult::fail(e.to_string())
            }
        }
    }

    /// Upload `file`, returning errors instead of a result envelope.
    ///
    /// # Errors
    ///
    /// Returns error if the file is invalid, the host is unreachable, or the
    /// host rejects the upload.
    pub async fn try_upload(
        &self,
        file: &MediaFile,
        folder: Option<&str>,
    ) -> Result<UploadedAsset, MediaError> {
        validate(file)?;

        let folder = folder
            .filter(|f| !f.is_empty())
            .unwrap_or(&self.config.default_folder)
            .to_string();
        let part = Part::bytes(file.data.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.essence())?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone())
            .text("cloud_name", self.config.cloud_name.clone())
            .text("folder", folder);

        tracing::debug!(file = %file.file_name, size = file.size(), "Uploading");

        let response = self
            .client
            .post(&self.config.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Host {
                status: status.as_u16(),
                message: host_error_message(&body),
            });
        }

        Ok(response.json::<UploadedAsset>().await?)
    }
}

/// The host reports errors as `{"error": {"message": ...}}`.
fn host_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "Upload rejected by the media host".to_string())
}
