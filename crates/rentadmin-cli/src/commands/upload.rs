//! Media upload command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use rentadmin_core::config::Config;
use rentadmin_media::{MediaFile, MediaUploader, UploadProgress, UploadQueue, UploadResult, UploaderConfig};

use crate::ui;

fn uploader(config: &Config) -> Result<MediaUploader> {
    let uploader_config = UploaderConfig::from_config(&config.media)?;
    Ok(MediaUploader::new(uploader_config)?)
}

async fn read_files(paths: &[PathBuf]) -> Result<Vec<MediaFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = MediaFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        files.push(file);
    }
    Ok(files)
}

/// Upload every file in order, driving a progress bar from queue events.
async fn upload_all(
    uploader: MediaUploader,
    files: Vec<MediaFile>,
    folder: Option<String>,
) -> Result<Vec<UploadResult>> {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut queue = UploadQueue::new(uploader).with_progress(tx);
    if let Some(folder) = folder {
        queue = queue.folder(folder);
    }
    queue.extend(files);

    let bar = pb.clone();
    let events = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                UploadProgress::Started { file_name, .. } => bar.set_message(file_name),
                UploadProgress::Finished { .. } => bar.inc(1),
            }
        }
    });

    let results = queue.run().await;
    // The queue owned the sender, so the receiver loop ends once it drains.
    events.await?;
    pb.finish_and_clear();
    Ok(results)
}

/// Upload files and attach the URLs to a resource payload.
///
/// Returns `None` (after printing why) if any upload failed, so nothing is
/// saved with a partial image set.
pub async fn upload_images(
    config: &Config,
    paths: &[PathBuf],
    folder: &str,
) -> Result<Option<Vec<String>>> {
    if paths.is_empty() {
        return Ok(Some(Vec::new()));
    }

    let uploader = uploader(config)?;
    let folder = format!("{}/{folder}", uploader.config().default_folder);
    let files = read_files(paths).await?;
    let results = upload_all(uploader, files, Some(folder)).await?;

    let mut urls = Vec::with_capacity(results.len());
    for (path, result) in paths.iter().zip(&results) {
        match result.url() {
            Some(url) => urls.push(url.to_string()),
            None => {
                report_failure(path, result);
                return Ok(None);
            }
        }
    }
    Ok(Some(urls))
}

fn report_failure(path: &Path, result: &UploadResult) {
    ui::error(&format!(
        "{}: {}",
        path.display(),
        result.error.as_deref().unwrap_or("Upload failed")
    ));
}

/// Run `rentadmin upload`.
pub async fn run_upload(
    config: &Config,
    paths: Vec<PathBuf>,
    folder: Option<String>,
    json: bool,
) -> Result<bool> {
    let uploader = uploader(config)?;
    let files = read_files(&paths).await?;
    let results = upload_all(uploader, files, folder).await?;

    if json {
        ui::json(&results)?;
        return Ok(results.iter().all(|r| r.success));
    }

    let mut failed = 0;
    for (path, result) in paths.iter().zip(&results) {
        match result.url() {
            Some(url) => ui::success(&format!("{} -> {url}", path.display())),
            None => {
                failed += 1;
                report_failure(path, result);
            }
        }
    }

    if failed > 0 {
        ui::warning(&format!("{failed} of {} uploads failed", results.len()));
    }
    Ok(failed == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_images_skips_upload() {
        let urls = upload_images(&Config::default(), &[], "cars").await.unwrap();
        assert_eq!(urls, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_read_files_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let front = dir.path().join("front.jpg");
        let terms = dir.path().join("terms.pdf");
        std::fs::write(&front, b"jpg").unwrap();
        std::fs::write(&terms, b"pdf").unwrap();

        let files = read_files(&[front, terms]).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["front.jpg", "terms.pdf"]);
        assert_eq!(files[1].content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_upload_requires_media_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"png").unwrap();

        let err = run_upload(&Config::default(), vec![path], None, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("media.cloudName"));
    }
}
