//! Files to upload and the pre-upload checks.

use std::path::Path;

use thiserror::Error;

use crate::MediaError;

/// Largest accepted file, in bytes (10 MB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Accepted MIME types.
pub const ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "application/pdf"];

/// Why a file was refused before upload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// MIME type is not on the allow-list.
    #[error("Unsupported file type: {content_type}. Allowed types: JPEG, PNG, WebP, PDF")]
    UnsupportedType {
        /// The rejected type.
        content_type: String,
    },

    /// File exceeds [`MAX_FILE_SIZE`].
    #[error("File is too large: {size} bytes (maximum is 10 MB)")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
    },
}

/// A file held in memory, ready to upload.
#[derive(Clone)]
pub struct MediaFile {
    /// Name sent to the host.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// Contents.
    pub data: Vec<u8>,
}

impl MediaFile {
    /// Create a file from raw parts.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Read a file from disk, guessing its type from the extension.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, MediaError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self {
            file_name,
            content_type,
            data,
        })
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// MIME type without parameters, lowercased.
    #[must_use]
    pub fn essence(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

impl std::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Check a file against the type allow-list and size ceiling. No I/O.
///
/// # Errors
///
/// Returns the first rule the file breaks.
pub fn validate(file: &MediaFile) -> Result<(), ValidationError> {
    let essence = file.essence();
    if !ALLOWED_TYPES.contains(&essence.as_str()) {
        return Err(ValidationError::UnsupportedType {
            content_type: file.content_type.clone(),
        });
    }

    let size = file.size();
    if size > MAX_FILE_SIZE {
        return Err(ValidationError::TooLarge { size });
    }

    Ok(())
}
