// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Features:
// - Breadth-first crawling, one synchronized round per depth level
// - Every URL of a level is fetched concurrently
// - Each domain is followed at most once for the whole crawl
// - Configurable depth limit and per-request timeout
//
// Submodules:
// - engine: the level loop and the per-URL crawl tasks
// - registry: the shared set of visited domains
// - validate: URL validation and domain extraction
// =============================================================================

mod engine;
mod registry;
mod validate;

pub use engine::{CrawlStats, Crawler};
pub use registry::DomainRegistry;
pub use validate::{parse_url, ParsedUrl};
