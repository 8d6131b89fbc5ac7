// src/links/mod.rs
// =============================================================================
// This module contains everything that works on a single URL or page:
//
// Submodules:
// - normalize: turns a URL into a comparison-safe "host/path" key
// - extract: finds the links on an HTML page and makes them absolute
//
// Both are pure functions with no shared state, so the crawl engine can call
// them from any number of tasks at once.
// =============================================================================

mod extract;
mod normalize;

// Re-export so callers write `links::normalize_url()` instead of
// `links::normalize::normalize_url()`
pub use extract::extract_links;
pub use normalize::{normalize_url, NormalizedUrl};
