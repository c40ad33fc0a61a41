use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::error::SinkError;
use super::{CloudStorage, FolderStatus};

pub const DEFAULT_API_BASE: &str = "https://cloud-api.yandex.net/v1/disk";

const SERVICE: &str = "Yandex Disk";

/// Response of `GET /resources/upload`.
#[derive(Debug, Deserialize)]
struct UploadLink {
    #[serde(default)]
    href: Option<String>,
}

/// Yandex Disk REST client. The client passed in must already carry the
/// `Authorization: OAuth <token>` header.
#[derive(Debug)]
pub struct YandexDisk {
    client: Client,
    api_base: String,
}

impl YandexDisk {
    pub fn new(client: Client) -> Self {
        Self::with_api_base(client, DEFAULT_API_BASE.to_string())
    }

    pub fn with_api_base(client: Client, api_base: String) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Authorization header value for a Yandex OAuth token.
    pub fn authorization(token: &str) -> String {
        format!("OAuth {}", token)
    }

    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<(), SinkError> {
        let url = format!("{}/resources/upload", self.api_base);
        let response = self
            .client
            .get(&url)
            .query(&[("path", path), ("overwrite", "true")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SinkError::from_response(SERVICE, response).await);
        }

        let link: UploadLink = serde_json::from_slice(&response.bytes().await?)?;
        let href = link.href.ok_or(SinkError::MissingField {
            service: SERVICE,
            field: "href",
        })?;

        let response = self.client.put(&href).body(bytes).send().await?;
        if !response.status().is_success() {
            return Err(SinkError::from_response(SERVICE, response).await);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CloudStorage for YandexDisk {
    async fn ensure_folder(&self, path: &str) -> Result<FolderStatus, SinkError> {
        let url = format!("{}/resources", self.api_base);
        let response = self
            .client
            .put(&url)
            .query(&[("path", path)])
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => {
                tracing::info!("Folder '{}' created on {}", path, SERVICE);
                Ok(FolderStatus::Created)
            }
            StatusCode::CONFLICT => {
                tracing::info!("Folder '{}' already exists on {}", path, SERVICE);
                Ok(FolderStatus::AlreadyExists)
            }
            _ => Err(SinkError::from_response(SERVICE, response).await),
        }
    }

    async fn put_object(&self, path: &str, bytes: Vec<u8>) -> bool {
        match self.upload(path, bytes).await {
            Ok(()) => {
                tracing::debug!("Uploaded '{}' to {}", path, SERVICE);
                true
            }
            Err(e) => {
                tracing::error!("Failed to upload '{}' to {}: {}", path, SERVICE, e);
                false
            }
        }
    }
}
