//! URL fetching - raw HTML for the extractor.
//!
//! The caller feeds the returned body straight to
//! [`crate::extract::extract_content`]. Size and time are bounded here so
//! the extractor never sees pathological inputs.

use std::time::Duration;
use tracing::info;
use url::Url;

use crate::error::{FetchError, FetchResult};

/// Response-size cap. Bigger bodies are almost never editorial pages.
const MAX_CONTENT_BYTES: usize = 5 * 1024 * 1024;

/// Whole-request deadline.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser-like User-Agent to avoid trivial bot blocks.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetch a page body for extraction.
pub async fn fetch_url(url: &str) -> FetchResult<String> {
    let parsed = Url::parse(url.trim()).map_err(|_| FetchError::InvalidUrl {
        url: url.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl {
            url: url.to_string(),
        });
    }

    info!(url = %parsed, "Fetching page");
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FetchError::Http(Box::new(e)))?;

    let response = client.get(parsed.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Http(Box::new(e))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: parsed.to_string(),
        });
    }

    if let Some(length) = response.content_length() {
        if length as usize > MAX_CONTENT_BYTES {
            return Err(FetchError::TooLarge {
                limit_bytes: MAX_CONTENT_BYTES,
            });
        }
    }

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Http(Box::new(e))
        }
    })?;

    if body.len() > MAX_CONTENT_BYTES {
        return Err(FetchError::TooLarge {
            limit_bytes: MAX_CONTENT_BYTES,
        });
    }

    Ok(body)
}
