// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr)
// 3. Run the crawl
// 4. Print the visited domains as a list or as JSON
// 5. Exit with proper code (0 = crawl completed, 2 = error)
// =============================================================================

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use cli::Cli;
use domain_crawler::{CrawlStats, Crawler};

// What we print at the end of a crawl
#[derive(Debug, Serialize)]
struct CrawlReport {
    seed_url: String,
    max_depth: usize,
    domains: Vec<String>,
    stats: CrawlStats,
}

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Logs go to stderr; stdout is reserved for the report
    logging::init_logging(cli.verbose)?;

    // Real HTTP fetcher + real HTML link extractor
    let config = cli.crawl_config();
    let crawler = Crawler::with_http(config)?;

    // Keep stdout pure JSON when --json is set
    if !cli.json {
        println!("🔍 Crawling from: {}", crawler.config().seed_url);
        println!("📊 Max crawl depth: {}", crawler.config().max_depth);
    }

    // Blocks until every level is done
    // An invalid seed comes back as Err and is printed once, by main()
    crawler.crawl().await?;

    // The registry is complete now that the crawl has returned
    let report = CrawlReport {
        seed_url: crawler.config().seed_url.clone(),
        max_depth: crawler.config().max_depth,
        domains: crawler.visited_domains(),
        stats: crawler.stats(),
    };

    print_report(&report, cli.json)?;
    Ok(0)
}

// Prints the report either as a plain list or JSON
fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_domains(report);
    }
    Ok(())
}

fn print_domains(report: &CrawlReport) {
    println!("\nCrawled domains:");
    for domain in &report.domains {
        println!("   {}", domain);
    }

    println!();

    let stats = &report.stats;
    println!("📊 Summary:");
    println!("   🌐 Domains: {}", stats.domains_visited);
    println!("   📄 Pages fetched: {}", stats.pages_fetched);
    println!("   ⚠️  Failed fetches: {}", stats.fetch_failures);
    println!("   🔁 Levels: {}", stats.levels_completed);
}
