use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Local folder '{0}' not found. Make sure it exists before uploading")]
    FolderNotFound(String),

    #[error("{service} API error (HTTP {status}): {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} response is missing '{field}'")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SinkError {
    /// Build an `Api` error from a non-success response, consuming its body.
    pub(crate) async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        SinkError::Api {
            service,
            status,
            body,
        }
    }
}
