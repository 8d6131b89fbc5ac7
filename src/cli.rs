// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Usage:
//   link-tally <BASE_URL> [MAX_CONCURRENCY] [MAX_PAGES] [--json]
//
// clap takes care of the error cases for us: a missing BASE_URL or a fourth
// positional argument prints a usage message and exits with a non-zero code.
// =============================================================================

use clap::Parser;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to generate the parsing code from the fields
#[derive(Parser, Debug)]
#[command(
    name = "link-tally",
    version = "0.1.0",
    about = "Crawl a website and report which of its pages are linked the most",
    long_about = "link-tally starts at BASE_URL, follows every link that stays on the same host, \
                  and prints how many times each page was linked. Links to other hosts are \
                  counted but never followed."
)]
pub struct Cli {
    /// Website to crawl (e.g., https://example.com)
    pub base_url: String,

    /// How many pages may be fetched at the same time
    #[arg(default_value_t = 1)]
    pub max_concurrency: usize,

    /// Stop discovering new pages after roughly this many
    #[arg(default_value_t = 10)]
    pub max_pages: usize,

    /// Output the report in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["link-tally", "https://blog.boot.dev"]).unwrap();
        assert_eq!(cli.base_url, "https://blog.boot.dev");
        assert_eq!(cli.max_concurrency, 1);
        assert_eq!(cli.max_pages, 10);
        assert!(!cli.json);
        assert_eq!(cli.timeout_secs, 10);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_all_positionals() {
        let cli = Cli::try_parse_from(["link-tally", "https://blog.boot.dev", "4", "50", "--json"]).unwrap();
        assert_eq!(cli.max_concurrency, 4);
        assert_eq!(cli.max_pages, 50);
        assert!(cli.json);
    }

    #[test]
    fn test_missing_url_is_rejected() {
        assert!(Cli::try_parse_from(["link-tally"]).is_err());
    }

    #[test]
    fn test_too_many_arguments_are_rejected() {
        let result = Cli::try_parse_from(["link-tally", "https://blog.boot.dev", "1", "10", "extra"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_limits_are_rejected() {
        assert!(Cli::try_parse_from(["link-tally", "https://blog.boot.dev", "many"]).is_err());
    }
}
