// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Validate the crawl configuration (a bad seed URL stops us here)
// 4. Run the crawl, stopping early if the user presses Ctrl-C
// 5. Print the sorted report on stdout
// 6. Exit with proper code (0 = success, 1 = startup error, 2 = bad arguments)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;     // src/cli.rs - command-line parsing
mod crawl;   // src/crawl/ - the concurrent crawl engine
mod error;   // src/error.rs - error types
mod fetch;   // src/fetch.rs - HTTP page downloads
mod links;   // src/links/ - URL normalization and link extraction
mod report;  // src/report.rs - sorted output

use std::time::Duration;

use anyhow::Result;
use clap::Parser; // Parser trait enables the parse() method
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use crawl::{CrawlConfig, Crawler};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = crawl finished (even if some pages failed to load)
//   Err = startup error (bad URL, bad limits)
async fn run() -> Result<i32> {
    // Invalid or extra arguments make clap print usage and exit with code 2
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let config = CrawlConfig::new(&cli.base_url, cli.max_concurrency, cli.max_pages)?
        .with_timeout(Duration::from_secs(cli.timeout_secs));

    let cancel = CancellationToken::new();
    watch_ctrl_c(cancel.clone());

    let outcome = Crawler::new(config)?.with_cancellation(cancel).run().await;

    report::print_report(&cli.base_url, &outcome, cli.json)?;
    Ok(0)
}

// RUST_LOG wins over --log-level when both are given
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Cancels the crawl on the first Ctrl-C; pages already fetched still make it
// into the report
fn watch_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, finishing pages already in flight");
            cancel.cancel();
        }
    });
}
