// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the struct below IS the list of arguments, and
// the doc comments on each field become the --help text.
//
// Example:
//   domain-crawler https://go.dev/doc/articles/wiki/ --max-depth 3 --timeout 5
// =============================================================================

use clap::Parser;

use domain_crawler::config::{CrawlConfig, DEFAULT_MAX_DEPTH, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "domain-crawler",
    version,
    about = "Crawl the web breadth-first and list every domain discovered",
    long_about = "domain-crawler starts at a seed URL, fetches every page of one depth level \
                  concurrently, follows links to domains it has not seen yet, and prints the \
                  set of distinct domains it visited."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://example.com)
    pub seed_url: String,

    /// Number of levels to crawl
    ///
    /// Depth 0 = no fetching, just the seed's domain
    /// Depth 1 = fetch the seed page
    /// Depth 2 = seed page + one page per new domain it links to
    /// etc.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Per-request timeout in seconds (0 = no timeout)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Output results in JSON format instead of a list
    #[arg(long)]
    pub json: bool,

    /// Log every page and skipped link (same as RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig::new(self.seed_url.clone())
            .with_max_depth(self.max_depth)
            .with_timeout_secs(self.timeout)
    }
}
