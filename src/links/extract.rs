// src/links/extract.rs
// =============================================================================
// This module extracts crawlable links from an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken markup is handled the way a browser would
//   (unclosed tags never abort parsing)
//
// We also use the `url` crate to resolve relative links against the page URL.
//
// Link rules (for each <a href="...">, in document order):
//   ""  or missing               -> skipped
//   contains a backslash         -> skipped (malformed, e.g. ":\\evil")
//   "http://..." / "https://..." -> kept exactly as written
//   "/"                          -> the site root, e.g. "https://example.com"
//   anything else                -> joined with the page URL like a browser
//                                   ("/docs" replaces the path, "docs"
//                                   replaces the last path segment)
//
// Duplicate links are kept. Counting repeats is the registry's job.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

use crate::error::CrawlError;

// Extracts all outbound links from an HTML page
//
// Parameters:
//   html_body: the HTML content to parse
//   page_url: the URL of the page (for resolving relative links); must start
//             with http:// or https://
//
// Returns: Vec<String> of absolute URLs, possibly empty
//
// Example:
//   html_body = "<a href='/path/one'>x</a>"
//   page_url = "https://blog.boot.dev"
//   result = ["https://blog.boot.dev/path/one"]
pub fn extract_links(html_body: &str, page_url: &str) -> Result<Vec<String>, CrawlError> {
    // Refuse to resolve against mailto:, file:, etc.
    if !is_http_url(page_url) {
        return Err(CrawlError::InvalidBaseUrl(page_url.to_string()));
    }
    let base = Url::parse(page_url).map_err(|_| CrawlError::InvalidBaseUrl(page_url.to_string()))?;

    let selector = Selector::parse("a").map_err(|e| CrawlError::Parse(e.to_string()))?;
    let document = Html::parse_document(html_body);

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        match resolve_href(&base, href.trim()) {
            Some(link) => links.push(link),
            None => tracing::trace!(href, page = page_url, "skipping href"),
        }
    }

    Ok(links)
}

// Resolves one href against the page it was found on
//
// Returns: Some(absolute_url), or None if the href should be skipped
fn resolve_href(base: &Url, href: &str) -> Option<String> {
    if href.is_empty() || href.contains('\\') {
        return None;
    }

    if is_http_url(href) {
        return Some(href.to_string());
    }

    if href == "/" {
        return Some(base.origin().ascii_serialization());
    }

    // Url::join follows the same rules a browser uses for relative links
    let joined = base.join(href).ok()?;
    if is_http_url(joined.as_str()) {
        Some(joined.to_string())
    } else {
        // mailto:, javascript:, tel: ...
        None
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
