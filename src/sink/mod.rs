//! Upload destinations: a cloud storage service addressed by path (Yandex
//! Disk) and a cloud drive addressed by folder id (Google Drive).

pub mod error;
pub mod gdrive;
pub mod yandex;

pub use error::SinkError;
pub use gdrive::GoogleDrive;
pub use yandex::YandexDisk;

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderStatus {
    Created,
    AlreadyExists,
}

/// Path-addressed object storage.
#[async_trait::async_trait]
pub trait CloudStorage: Send + Sync {
    /// Create `path` as a folder. An existing folder is not an error.
    async fn ensure_folder(&self, path: &str) -> Result<FolderStatus, SinkError>;

    /// Store `bytes` at `path`, replacing any existing object. Failures are
    /// logged and reported as `false`.
    async fn put_object(&self, path: &str, bytes: Vec<u8>) -> bool;
}

/// Folder-based drive storage.
#[async_trait::async_trait]
pub trait DriveSink: Send + Sync {
    async fn create_folder(&self, name: &str) -> Result<String, SinkError>;

    /// Upload every regular file in `local_path` into the drive folder.
    async fn upload_folder_contents(
        &self,
        folder_id: &str,
        local_path: &Path,
    ) -> Result<UploadReport, SinkError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: Vec<String>,
    pub failed: Vec<String>,
}
