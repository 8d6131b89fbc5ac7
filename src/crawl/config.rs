// src/crawl/config.rs
// =============================================================================
// Per-run crawl parameters.
//
// A CrawlConfig is built once at startup (from the command line) and never
// changes afterwards. Building it is where a bad seed URL gets rejected, so
// that error stops the program before any crawling starts.
// =============================================================================

use std::time::Duration;

use url::Url;

use crate::error::CrawlError;

/// Default per-request timeout, same as the HTTP client we started from
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    base_url: Url,
    max_concurrency: usize,
    max_pages: usize,
    timeout: Duration,
}

impl CrawlConfig {
    // Validates the crawl parameters
    //
    // Parameters:
    //   base_url: the seed page; its host (and port) is the crawl boundary
    //   max_concurrency: how many pages may be fetched at once (at least 1)
    //   max_pages: soft limit on the number of distinct pages discovered
    pub fn new(base_url: &str, max_concurrency: usize, max_pages: usize) -> Result<Self, CrawlError> {
        let parsed = Url::parse(base_url).map_err(|_| CrawlError::InvalidUrl(base_url.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(CrawlError::InvalidBaseUrl(base_url.to_string()));
        }

        if max_concurrency == 0 {
            return Err(CrawlError::InvalidConfig(
                "max concurrency must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            base_url: parsed,
            max_concurrency,
            max_pages,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// True when `url` lives on the same host and port as the seed
    ///
    /// Only explicit ports are compared, so http:// and https:// links to the
    /// seed's host both count as internal.
    pub fn is_same_host(&self, url: &Url) -> bool {
        url.host_str() == self.base_url.host_str() && url.port() == self.base_url.port()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = CrawlConfig::new("https://blog.boot.dev", 3, 25).unwrap();
        assert_eq!(config.base_url().host_str(), Some("blog.boot.dev"));
        assert_eq!(config.max_concurrency(), 3);
        assert_eq!(config.max_pages(), 25);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_unparseable_seed() {
        let err = CrawlConfig::new(r":\\invalidURL", 1, 10).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidUrl(_)));
    }

    #[test]
    fn test_non_http_seed() {
        let err = CrawlConfig::new("ftp://files.example.com", 1, 10).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidBaseUrl(_)));

        let err = CrawlConfig::new("mailto:someone@example.com", 1, 10).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_zero_concurrency() {
        let err = CrawlConfig::new("https://blog.boot.dev", 0, 10).unwrap_err();
        assert!(matches!(err, CrawlError::InvalidConfig(_)));
    }

    #[test]
    fn test_same_host_compares_host_and_port() {
        let config = CrawlConfig::new("http://127.0.0.1:8080/start", 1, 10).unwrap();

        assert!(config.is_same_host(&Url::parse("http://127.0.0.1:8080/other").unwrap()));
        assert!(!config.is_same_host(&Url::parse("http://127.0.0.1:9090/other").unwrap()));
        assert!(!config.is_same_host(&Url::parse("http://example.com:8080/").unwrap()));
    }

    #[test]
    fn test_default_port_matches_explicit_port() {
        let config = CrawlConfig::new("https://blog.boot.dev", 1, 10).unwrap();
        assert!(config.is_same_host(&Url::parse("https://blog.boot.dev:443/path").unwrap()));
        assert!(config.is_same_host(&Url::parse("https://BLOG.boot.dev/path").unwrap()));
        assert!(config.is_same_host(&Url::parse("http://blog.boot.dev/path").unwrap()));
    }
}
