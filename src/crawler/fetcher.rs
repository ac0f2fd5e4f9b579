use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use reqwest::Client;
use tracing::debug;

use crate::error::FetchError;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; CompanyResearchAgent/1.0)";

/// One fetched page. Body is the decoded text; status has already been
/// checked for success.
#[derive(Debug)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Retrieves a single URL with a timeout and a browser-like header set.
/// No retries here; retry is a coordinator policy.
pub struct PageFetcher {
    client: Client,
    timeout_seconds: u64,
    max_body_bytes: usize,
}

impl PageFetcher {
    pub fn new(timeout_seconds: u64, max_body_bytes: usize) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            timeout_seconds,
            max_body_bytes,
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    seconds: self.timeout_seconds,
                }
            } else {
                FetchError::Network {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NonOkStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Reject oversized bodies up front when the server declares them.
        if let Some(length) = response.content_length() {
            if length as usize > self.max_body_bytes {
                return Err(FetchError::BodyTooLarge {
                    url: url.to_string(),
                    limit_bytes: self.max_body_bytes,
                });
            }
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                    seconds: self.timeout_seconds,
                }
            } else {
                FetchError::Network {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        // Servers that omit Content-Length are checked after download.
        if body.len() > self.max_body_bytes {
            return Err(FetchError::BodyTooLarge {
                url: url.to_string(),
                limit_bytes: self.max_body_bytes,
            });
        }

        debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(FetchedPage {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}
