// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// Every error here is local to one crawl task: the engine logs it and stops
// expanding that page, but the rest of the crawl keeps going. Only a bad
// startup configuration (unparseable seed URL, zero concurrency) ends the run.
//
// We use the `thiserror` crate to derive std::error::Error and Display from
// the #[error(...)] attributes.
// =============================================================================

use thiserror::Error;

/// Everything that can go wrong while normalizing, extracting or crawling
#[derive(Debug, Error)]
pub enum CrawlError {
    /// A URL string (seed or discovered link) could not be parsed
    #[error("couldn't parse URL '{0}'")]
    InvalidUrl(String),

    /// The page we extract links from is not an http(s) URL
    #[error("couldn't parse base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The HTML could not be processed
    #[error("couldn't parse HTML: {0}")]
    Parse(String),

    /// Crawl parameters are out of range
    #[error("invalid crawl configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised by the HTTP fetcher
///
/// Kept apart from `CrawlError`: a failed download is counted and logged by the
/// engine, never returned from it.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_original_wording() {
        let err = CrawlError::InvalidUrl(r":\\invalidURL".to_string());
        assert!(err.to_string().contains("couldn't parse URL"));

        let err = CrawlError::InvalidBaseUrl(r":\\invalidBaseURL".to_string());
        assert!(err.to_string().contains("couldn't parse base URL"));
    }

    #[test]
    fn test_fetch_error_messages_name_the_url() {
        let err = FetchError::Status {
            url: "https://example.com".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "https://example.com returned HTTP 404");

        let err = FetchError::Timeout {
            url: "https://example.com/slow".to_string(),
        };
        assert_eq!(err.to_string(), "request to https://example.com/slow timed out");
    }
}
