// src/fetch.rs
// =============================================================================
// This module downloads pages over HTTP.
//
// Key functionality:
// - Plain GET request, no custom headers
// - Redirects are followed with reqwest's default policy
// - The whole body is read into memory before returning
// - Any non-2xx status or network failure becomes a FetchError
//
// There is no retry. A failed fetch just means the crawler does not expand
// links from that page.
// =============================================================================

use std::time::Duration;

use reqwest::Client;

use crate::error::FetchError;

/// HTTP client used by every crawl task
///
/// Cloning is cheap: reqwest::Client is an Arc internally.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    // Builds a fetcher
    //
    // Parameters:
    //   timeout: upper bound for one request, connect + body
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            // No idle connections are kept, so every fetch opens its own
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self { client })
    }

    // Fetches a page and returns its body as text
    //
    // Parameters:
    //   url: absolute http(s) URL to GET
    //
    // Returns: the response body, or FetchError
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| categorize_error(url, e))
    }
}

// Maps a reqwest error onto our error type
//
// Timeouts get their own variant so the log line says what happened;
// everything else (DNS, refused connection, TLS, too many redirects, a body
// that stops halfway) is a transport error.
fn categorize_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
