// src/report.rs
// =============================================================================
// This module turns the finished crawl into a sorted report.
//
// Pages are ordered by how many times they were linked (most first). Pages
// with the same count are ordered alphabetically so the output is the same
// on every run.
// =============================================================================

use std::collections::HashMap;

use anyhow::Result;
use serde::Serialize;

use crate::crawl::{CrawlOutcome, CrawlStats};
use crate::links::NormalizedUrl;

/// One line of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageCount {
    pub url: String,
    pub count: usize,
}

// The whole report, as written by --json
#[derive(Debug, Serialize)]
struct Report<'a> {
    base_url: &'a str,
    pages: Vec<PageCount>,
    stats: CrawlStats,
}

// Sorts pages by count (descending), then URL (ascending)
pub fn sort_pages(pages: &HashMap<NormalizedUrl, usize>) -> Vec<PageCount> {
    let mut sorted: Vec<PageCount> = pages
        .iter()
        .map(|(url, count)| PageCount {
            url: url.as_str().to_owned(),
            count: *count,
        })
        .collect();

    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.url.cmp(&b.url)));
    sorted
}

// Prints the report either as a table or JSON
//
// Parameters:
//   base_url: the seed URL, shown in the header
//   outcome: the finished crawl
//   json: whether to output JSON format
pub fn print_report(base_url: &str, outcome: &CrawlOutcome, json: bool) -> Result<()> {
    let pages = sort_pages(&outcome.pages);

    if json {
        let report = Report {
            base_url,
            pages,
            stats: outcome.stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(base_url, &pages, &outcome.stats);
    }
    Ok(())
}

fn print_table(base_url: &str, pages: &[PageCount], stats: &CrawlStats) {
    println!("{}", "=".repeat(29));
    println!("REPORT for {}", base_url);
    println!("{}", "=".repeat(29));

    for page in pages {
        println!("Found {} internal links to {}", page.count, page.url);
    }

    println!();
    println!("📊 Summary:");
    println!("   📄 Pages discovered: {}", pages.len());
    println!("   ✅ Fetched: {}", stats.pages_fetched);
    println!("   ❌ Failed: {}", stats.fetch_failures);
    println!("   🌐 External links: {}", stats.external_links);
    println!("   ⏭️  Skipped (page budget): {}", stats.skipped_over_budget);
}
