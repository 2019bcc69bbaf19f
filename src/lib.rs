// src/lib.rs
// =============================================================================
// domain-crawler as a library.
//
// The binary (src/main.rs) is a thin CLI around these modules; tests and
// other programs can build a Crawler directly and plug in their own
// PageFetcher / LinkExtractor.
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;

pub use config::CrawlConfig;
pub use crawl::{CrawlStats, Crawler, DomainRegistry};
pub use error::{CrawlError, FetchError, UrlError};
