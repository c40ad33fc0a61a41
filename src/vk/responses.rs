use serde::Deserialize;
use serde_json::Value;

use crate::photos::{PhotoRecord, SizeVariant};

/// Every VK method answers with either `response` or `error`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub response: Option<T>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

/// `utils.resolveScreenName` returns an object on a match and an empty array
/// when nothing matches.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    Found(ResolvedObject),
    Missing(Vec<Value>),
}

#[derive(Debug, Deserialize)]
pub struct ResolvedObject {
    pub object_id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl ResolvedObject {
    /// Owner id as used by `photos.get`: communities are addressed with a
    /// negative id.
    pub fn owner_id(&self) -> String {
        match self.kind.as_str() {
            "group" | "page" | "event" => format!("-{}", self.object_id),
            _ => self.object_id.to_string(),
        }
    }
}

/// `photos.get` with `extended=1` and `photo_sizes=1`.
#[derive(Debug, Deserialize)]
pub struct PhotosPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub items: Vec<PhotoItem>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoItem {
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub likes: Likes,
    #[serde(default)]
    pub sizes: Vec<PhotoSize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Likes {
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct PhotoSize {
    #[serde(default)]
    pub height: u32,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub url: String,
}

impl From<PhotoItem> for PhotoRecord {
    fn from(item: PhotoItem) -> Self {
        PhotoRecord {
            likes: item.likes.count,
            date: item.date,
            sizes: item
                .sizes
                .into_iter()
                .map(|s| SizeVariant {
                    height: s.height,
                    kind: s.kind,
                    url: s.url,
                })
                .collect(),
        }
    }
}
