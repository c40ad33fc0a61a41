//! VK API client: resolves screen names, fetches one page of profile photos
//! and downloads the photo bytes.

pub mod error;
pub mod responses;

pub use error::SourceError;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::photos::PhotoRecord;
use error::AUTH_FAILED_CODE;
use responses::{ApiError, Envelope, PhotosPage, ResolveResponse};

pub const DEFAULT_API_BASE: &str = "https://api.vk.com/method";
pub const API_VERSION: &str = "5.131";

/// Where photos come from.
#[async_trait::async_trait]
pub trait SourceClient: Send + Sync {
    /// Turn a screen name or numeric id into a numeric owner id.
    async fn resolve_handle(&self, handle: &str) -> Result<String, SourceError>;

    /// Fetch up to `count` photos of the owner's profile album, starting at
    /// `offset`.
    async fn fetch_page(
        &self,
        owner_id: &str,
        count: u32,
        offset: u32,
    ) -> Result<Vec<PhotoRecord>, SourceError>;

    /// Download the raw bytes behind a photo URL.
    async fn download(&self, url: &str) -> Result<Vec<u8>, SourceError>;
}

/// True when `handle` is already a numeric id and needs no lookup.
pub fn is_numeric_id(handle: &str) -> bool {
    !handle.is_empty() && handle.bytes().all(|b| b.is_ascii_digit())
}

pub struct VkClient {
    client: Client,
    api_base: String,
    token: String,
}

impl std::fmt::Debug for VkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VkClient")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl VkClient {
    pub fn new(client: Client, token: String) -> Self {
        Self::with_api_base(client, token, DEFAULT_API_BASE.to_string())
    }

    pub fn with_api_base(client: Client, token: String, api_base: String) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Call a VK method and split the envelope into its payload or API error.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<Result<T, ApiError>, SourceError> {
        let url = format!("{}/{}", self.api_base, method);
        tracing::debug!(method, "Calling VK API");
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("access_token", self.token.as_str()), ("v", API_VERSION)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::HttpStatus {
                status: response.status().as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        match (envelope.response, envelope.error) {
            (_, Some(err)) => Ok(Err(err)),
            (Some(payload), None) => Ok(Ok(payload)),
            (None, None) => Ok(Err(ApiError {
                error_code: 0,
                error_msg: format!("{} returned neither response nor error", method),
            })),
        }
    }
}

#[async_trait::async_trait]
impl SourceClient for VkClient {
    async fn resolve_handle(&self, handle: &str) -> Result<String, SourceError> {
        let handle = handle.trim();
        if is_numeric_id(handle) {
            return Ok(handle.to_string());
        }
        if handle.is_empty() {
            return Err(SourceError::NotFound(String::new()));
        }

        match self
            .call::<ResolveResponse>("utils.resolveScreenName", &[("screen_name", handle)])
            .await?
        {
            Ok(ResolveResponse::Found(obj)) => {
                let owner_id = obj.owner_id();
                tracing::info!(handle, owner_id = %owner_id, kind = %obj.kind, "Resolved screen name");
                Ok(owner_id)
            }
            Ok(ResolveResponse::Missing(_)) => Err(SourceError::NotFound(handle.to_string())),
            Err(e) if e.error_code == AUTH_FAILED_CODE => Err(SourceError::Auth(e.error_msg)),
            Err(e) => Err(SourceError::Api {
                code: e.error_code,
                message: e.error_msg,
            }),
        }
    }

    async fn fetch_page(
        &self,
        owner_id: &str,
        count: u32,
        offset: u32,
    ) -> Result<Vec<PhotoRecord>, SourceError> {
        let count_str = count.to_string();
        let offset_str = offset.to_string();
        let params = [
            ("owner_id", owner_id),
            ("album_id", "profile"),
            ("extended", "1"),
            ("photo_sizes", "1"),
            ("count", count_str.as_str()),
            ("offset", offset_str.as_str()),
        ];

        match self.call::<PhotosPage>("photos.get", &params).await? {
            Ok(page) => {
                tracing::info!(
                    owner_id,
                    fetched = page.items.len(),
                    total = page.count,
                    "Fetched profile photos"
                );
                Ok(page.items.into_iter().map(PhotoRecord::from).collect())
            }
            Err(e) if e.error_code == AUTH_FAILED_CODE => Err(SourceError::Auth(e.error_msg)),
            Err(e) => Err(SourceError::BlockedOrPrivate {
                owner_id: owner_id.to_string(),
                message: e.error_msg,
            }),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
