// src/links/normalize.rs
// =============================================================================
// This module turns a URL into a stable key used to decide whether two links
// point at the same page.
//
// Rules:
// - Everything is lowercased
// - Scheme, port, query string and fragment are dropped
// - Trailing slashes are removed from the path
// - Non-ASCII path characters stay percent-encoded, with lowercase hex
//
// So all of these become "blog.boot.dev/path":
//   https://blog.boot.dev/path
//   http://BLOG.boot.dev/PATH/
//   https://blog.boot.dev/path?page=2#top
// =============================================================================

use std::borrow::Borrow;
use std::fmt;

use url::{ParseError, Url};

use crate::error::CrawlError;

/// A canonical "host + path" key for a page
///
/// Built only by `normalize_url`, so every value follows the rules above.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl(String);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets a HashMap<NormalizedUrl, _> be queried with a plain &str
impl Borrow<str> for NormalizedUrl {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Normalizes a URL string
//
// Parameters:
//   raw: any absolute URL, or an already-normalized "host/path" key
//
// Returns: the NormalizedUrl, or CrawlError::InvalidUrl if it can't be parsed
//
// Example:
//   normalize_url("https://BLOG.boot.dev/PATH//") -> "blog.boot.dev/path"
pub fn normalize_url(raw: &str) -> Result<NormalizedUrl, CrawlError> {
    let lowered = raw.trim().to_lowercase();
    let invalid = || CrawlError::InvalidUrl(raw.to_string());

    // A leading ':' means the scheme is missing entirely (e.g. ":\\invalidURL")
    if lowered.is_empty() || lowered.starts_with(':') {
        return Err(invalid());
    }

    let parsed = match Url::parse(&lowered) {
        Ok(url) => url,
        // No scheme: treat the input as "host/path" so a key normalizes to itself
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("http://{}", lowered)).map_err(|_| invalid())?
        }
        Err(_) => return Err(invalid()),
    };

    let host = parsed.host_str().unwrap_or("");
    // The parser percent-encodes non-ASCII with uppercase hex, so lowercase again
    let path = parsed.path().to_lowercase();
    let path = path.trim_end_matches('/');

    Ok(NormalizedUrl(format!("{}{}", host, path)))
}
