// src/crawl/mod.rs
// =============================================================================
// This module handles crawling a website.
//
// Features:
// - Concurrent crawling with a configurable number of parallel fetches
// - Same-host restriction (other hosts are counted, never crawled)
// - Soft page budget
// - Every page is fetched at most once, however many pages link to it
//
// Submodules:
// - config: validated per-run parameters
// - registry: thread-safe page -> link count map
// - engine: the task scheduler that ties it all together
// =============================================================================

mod config;
mod engine;
mod registry;

pub use config::CrawlConfig;
pub use engine::{CrawlOutcome, CrawlStats, Crawler};
