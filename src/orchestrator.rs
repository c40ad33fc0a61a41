//! Runs one backup: fetch the photo page once, then feed the same normalized
//! set to the cloud upload, the local download and the drive upload.

use std::path::PathBuf;

use thiserror::Error;

use crate::download::{self, DownloadReport};
use crate::photo_log::{LogError, PhotoLog};
use crate::photos::{self, Normalized, NormalizeError};
use crate::sink::{CloudStorage, DriveSink, FolderStatus, SinkError, UploadReport};
use crate::vk::{SourceClient, SourceError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Cannot use download folder {path}: {source}")]
    LocalFolder {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to read answer: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("Google Drive is not configured: add gdrive_token to [TOKENS] or set GDRIVE_TOKEN")]
    DriveNotConfigured,
}

impl RunError {
    /// Whether the run must stop. Step-local failures only end their step.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            RunError::Sink(SinkError::FolderNotFound(_)) | RunError::DriveNotConfigured
        )
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub handle: String,
    pub folder: String,
    pub count: u32,
    pub offset: u32,
    pub download_dir: PathBuf,
    pub no_progress_bar: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudReport {
    /// `None` when creating the folder failed and uploads went ahead anyway.
    pub folder_status: Option<FolderStatus>,
    pub uploaded: Vec<String>,
    pub failed: Vec<String>,
}

pub struct Orchestrator {
    source: Box<dyn SourceClient>,
    cloud: Box<dyn CloudStorage>,
    drive: Option<Box<dyn DriveSink>>,
    log: Box<dyn PhotoLog>,
    options: RunOptions,
}

impl Orchestrator {
    pub fn new(
        source: Box<dyn SourceClient>,
        cloud: Box<dyn CloudStorage>,
        drive: Option<Box<dyn DriveSink>>,
        log: Box<dyn PhotoLog>,
        options: RunOptions,
    ) -> Self {
        Self {
            source,
            cloud,
            drive,
            log,
            options,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Resolve the handle, fetch one page and normalize it. The log is only
    /// reset once the page has been fetched successfully.
    pub async fn fetch(&mut self) -> Result<Normalized, RunError> {
        let owner_id = self.source.resolve_handle(&self.options.handle).await?;
        tracing::info!("Resolved '{}' to owner id {}", self.options.handle, owner_id);

        let records = self
            .source
            .fetch_page(&owner_id, self.options.count, self.options.offset)
            .await?;
        tracing::info!("Fetched {} photos", records.len());

        self.log.reset()?;
        let normalized = photos::normalize(&records)?;
        for entry in &normalized.log {
            self.log.append(entry)?;
        }
        tracing::debug!(
            records = records.len(),
            named = normalized.len(),
            "Normalized photo page"
        );
        Ok(normalized)
    }

    /// Copy every photo into the cloud folder, in order.
    pub async fn upload_to_cloud(&self, photos: &Normalized) -> Result<CloudReport, RunError> {
        let folder = &self.options.folder;
        let mut report = CloudReport::default();

        match self.cloud.ensure_folder(folder).await {
            Ok(status) => {
                match status {
                    FolderStatus::Created => tracing::info!("Created cloud folder '{}'", folder),
                    FolderStatus::AlreadyExists => {
                        tracing::info!("Cloud folder '{}' already exists", folder)
                    }
                }
                report.folder_status = Some(status);
            }
            Err(e) => tracing::warn!("Could not create cloud folder '{}': {}", folder, e),
        }

        let pb = download::create_progress_bar(self.options.no_progress_bar, photos.len() as u64);
        for (counter, photo) in photos.entries().enumerate() {
            pb.set_message(photo.file_name.to_string());
            let path = format!("{}/{}", folder, photo.file_name);

            let stored = match self.source.download(photo.url).await {
                Ok(bytes) => self.cloud.put_object(&path, bytes).await,
                Err(e) => {
                    pb.suspend(|| tracing::error!("Failed to fetch {}: {}", photo.file_name, e));
                    false
                }
            };

            if stored {
                pb.suspend(|| {
                    tracing::info!(
                        "Uploaded photo {} of {} to cloud: {}",
                        counter + 1,
                        photos.len(),
                        path
                    )
                });
                report.uploaded.push(photo.file_name.to_string());
            } else {
                report.failed.push(photo.file_name.to_string());
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
        Ok(report)
    }

    pub async fn download_local(&self, photos: &Normalized) -> Result<DownloadReport, RunError> {
        let dir = &self.options.download_dir;
        let pb = download::create_progress_bar(self.options.no_progress_bar, photos.len() as u64);
        download::download_to_dir(self.source.as_ref(), photos, dir, &pb)
            .await
            .map_err(|source| RunError::LocalFolder {
                path: dir.display().to_string(),
                source,
            })
    }

    /// Create a drive folder named after the cloud folder and upload the local
    /// download folder into it.
    pub async fn upload_to_drive(&self) -> Result<UploadReport, RunError> {
        let drive = self.drive.as_ref().ok_or(RunError::DriveNotConfigured)?;
        let folder_id = drive.create_folder(&self.options.folder).await?;
        let report = drive
            .upload_folder_contents(&folder_id, &self.options.download_dir)
            .await?;
        Ok(report)
    }
}
