use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::Client;

const DEFAULT_USER_AGENT: &str = concat!("vk-photo-backup/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build an HTTP client, optionally sending `authorization` with every request.
///
/// Only the connect phase is bounded; transfers of large photos run to
/// completion.
pub fn build_client(authorization: Option<&str>) -> anyhow::Result<Client> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    if let Some(value) = authorization {
        let mut header = HeaderValue::from_str(value)
            .context("Access token contains characters not allowed in an HTTP header")?;
        header.set_sensitive(true);
        default_headers.insert(AUTHORIZATION, header);
    }

    let client = Client::builder()
        .default_headers(default_headers)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_plain() {
        assert!(build_client(None).is_ok());
    }

    #[test]
    fn test_build_client_rejects_newline_in_token() {
        assert!(build_client(Some("OAuth abc\ndef")).is_err());
    }
}
