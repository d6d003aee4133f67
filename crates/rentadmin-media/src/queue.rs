//! Ordered multi-file uploads.
//!
//! One upload in flight at a time, so progress events arrive in submission
//! order and each file's outcome is known before the next starts.

use std::collections::VecDeque;

use tokio::sync::mpsc::UnboundedSender;

use crate::file::MediaFile;
use crate::upload::{MediaUploader, UploadResult};

/// Progress of a queued upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadProgress {
    /// Upload `index` (0-based) of `total` started.
    Started {
        /// Position in the queue.
        index: usize,
        /// Queue length.
        total: usize,
        /// File being uploaded.
        file_name: String,
    },
    /// Upload `index` of `total` finished.
    Finished {
        /// Position in the queue.
        index: usize,
        /// Queue length.
        total: usize,
        /// File that was uploaded.
        file_name: String,
        /// Whether it was stored.
        success: bool,
    },
}

/// Sequential upload queue.
#[derive(Debug)]
pub struct UploadQueue {
    uploader: MediaUploader,
    folder: Option<String>,
    files: VecDeque<MediaFile>,
    progress: Option<UnboundedSender<UploadProgress>>,
}

impl UploadQueue {
    /// Empty queue.
    #[must_use]
    pub fn new(uploader: MediaUploader) -> Self {
        Self {
            uploader,
            folder: None,
            files: VecDeque::new(),
            progress: None,
        }
    }

    /// Upload into `folder` instead of the default.
    #[must_use]
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Report progress on `sender`.
    #[must_use]
    pub fn with_progress(mut self, sender: UnboundedSender<UploadProgress>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Add a file to the end of the queue.
    pub fn push(&mut self, file: MediaFile) {
        self.files.push_back(file);
    }

    /// Queued files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn report(&self, event: UploadProgress) {
        if let Some(progress) = &self.progress {
            // Receiver may have gone away; uploads continue regardless.
            let _ = progress.send(event);
        }
    }

    /// Upload every queued file in order. Results match submission order.
    pub async fn run(mut self) -> Vec<UploadResult> {
        let total = self.files.len();
        let mut results = Vec::with_capacity(total);

        let mut index = 0;
        while let Some(file) = self.files.pop_front() {
            self.report(UploadProgress::Started {
                index,
                total,
                file_name: file.file_name.clone(),
            });

            let result = self.uploader.upload(&file, self.folder.as_deref()).await;

            self.report(UploadProgress::Finished {
                index,
                total,
                file_name: file.file_name.clone(),
                success: result.success,
            });
            results.push(result);
            index += 1;
        }

        tracing::info!(
            total,
            failed = results.iter().filter(|r| !r.success).count(),
            "Upload queue drained"
        );
        results
    }
}

impl Extend<MediaFile> for UploadQueue {
    fn extend<I: IntoIterator<Item = MediaFile>>(&mut self, iter: I) {
        self.files.extend(iter);
    }
}
