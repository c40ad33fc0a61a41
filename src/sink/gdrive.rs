use std::path::Path;

use reqwest::header::LOCATION;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::error::SinkError;
use super::{DriveSink, UploadReport};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com";

const SERVICE: &str = "Google Drive";
const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

#[derive(Debug, Deserialize)]
struct DriveFile {
    #[serde(default)]
    id: Option<String>,
}

/// Google Drive v3 client. The client passed in must already carry the
/// `Authorization: Bearer <token>` header.
#[derive(Debug)]
pub struct GoogleDrive {
    client: Client,
    api_base: String,
}

impl GoogleDrive {
    pub fn new(client: Client) -> Self {
        Self::with_api_base(client, DEFAULT_API_BASE.to_string())
    }

    pub fn with_api_base(client: Client, api_base: String) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn authorization(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Resumable upload: open a session carrying the metadata, then send the
    /// bytes to the session URI from the `Location` header.
    async fn upload_file(
        &self,
        folder_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, SinkError> {
        let url = format!("{}/upload/drive/v3/files", self.api_base);
        let response = self
            .client
            .post(&url)
            .query(&[("uploadType", "resumable"), ("fields", "id")])
            .header("X-Upload-Content-Length", bytes.len())
            .json(&json!({"name": file_name, "parents": [folder_id]}))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SinkError::from_response(SERVICE, response).await);
        }

        let session_uri = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(SinkError::MissingField {
                service: SERVICE,
                field: "Location",
            })?;

        let response = self.client.put(&session_uri).body(bytes).send().await?;
        if !response.status().is_success() {
            return Err(SinkError::from_response(SERVICE, response).await);
        }
        let file: DriveFile = serde_json::from_slice(&response.bytes().await?)?;
        file.id.ok_or(SinkError::MissingField {
            service: SERVICE,
            field: "id",
        })
    }
}

/// Regular files directly inside `dir`, sorted by name.
async fn list_files(dir: &Path) -> Result<Vec<std::path::PathBuf>, SinkError> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[async_trait::async_trait]
impl DriveSink for GoogleDrive {
    async fn create_folder(&self, name: &str) -> Result<String, SinkError> {
        let url = format!("{}/drive/v3/files", self.api_base);
        let response = self
            .client
            .post(&url)
            .query(&[("fields", "id")])
            .json(&json!({"name": name, "mimeType": FOLDER_MIME_TYPE}))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SinkError::from_response(SERVICE, response).await);
        }

        let folder: DriveFile = serde_json::from_slice(&response.bytes().await?)?;
        let id = folder.id.ok_or(SinkError::MissingField {
            service: SERVICE,
            field: "id",
        })?;
        tracing::info!("Created {} folder '{}' (id {})", SERVICE, name, id);
        Ok(id)
    }

    async fn upload_folder_contents(
        &self,
        folder_id: &str,
        local_path: &Path,
    ) -> Result<UploadReport, SinkError> {
        if !local_path.is_dir() {
            return Err(SinkError::FolderNotFound(local_path.display().to_string()));
        }

        let mut report = UploadReport::default();
        for path in list_files(local_path).await? {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let result = match tokio::fs::read(&path).await {
                Ok(bytes) => self.upload_file(folder_id, &file_name, bytes).await,
                Err(e) => Err(SinkError::Io(e)),
            };
            match result {
                Ok(id) => {
                    tracing::info!("Uploaded {} to {} (id {})", file_name, SERVICE, id);
                    report.uploaded.push(file_name);
                }
                Err(e) => {
                    tracing::error!("Failed to upload {} to {}: {}", file_name, SERVICE, e);
                    report.failed.push(file_name);
                }
            }
        }

        tracing::info!(
            "Uploaded {} files from {} to {} folder {}",
            report.uploaded.len(),
            local_path.display(),
            SERVICE,
            folder_id
        );
        Ok(report)
    }
}
