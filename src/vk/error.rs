use thiserror::Error;

/// VK error code for a rejected or expired access token.
pub const AUTH_FAILED_CODE: i64 = 5;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("VK rejected the access token: {0}")]
    Auth(String),

    #[error("No VK user or community matches '{0}'")]
    NotFound(String),

    #[error(
        "Could not load photos of {owner_id} ({message}). The account may be blocked, \
         deleted or not yet created; check the name you entered and make sure the \
         profile album is not hidden by privacy settings"
    )]
    BlockedOrPrivate { owner_id: String, message: String },

    #[error("VK API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("HTTP error {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
