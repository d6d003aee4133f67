//! # Rentadmin Media
//!
//! Uploads images and documents to the asset host and returns durable URLs
//! for resource payloads. Files are checked against a type allow-list and a
//! 10 MB ceiling before any network call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod file;
pub mod queue;
pub mod upload;

#[cfg(test)]
mod testing;

pub use file::{ALLOWED_TYPES, MAX_FILE_SIZE, MediaFile, ValidationError, validate};
pub use queue::{UploadProgress, UploadQueue};
pub use upload::{MediaUploader, UploadResult, UploadedAsset, UploaderConfig};

/// Media errors.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// File refused before upload.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The host refused the upload.
    #[error("Upload failed ({status}): {message}")]
    Host {
        /// HTTP status code.
        status: u16,
        /// Host message.
        message: String,
    },

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid configuration.
    #[error("Config error: {0}")]
    Config(String),
}
