// src/fetch/mod.rs
// =============================================================================
// This module contains everything that talks to the outside world on behalf
// of the crawler.
//
// Submodules:
// - http: Downloads pages (PageFetcher implementation using reqwest)
// - html: Pulls links out of downloaded pages (LinkExtractor using scraper)
//
// The crawl engine only knows about the two traits below. That keeps the
// engine testable: tests hand it fake fetchers that serve canned pages.
// =============================================================================

mod html;
mod http;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::FetchError;

pub use html::HtmlLinkExtractor;
pub use http::HttpFetcher;

// Downloads the content of a page.
//
// `timeout` is a hard upper bound on the whole network round trip;
// `None` means no bound.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Option<Duration>) -> Result<String, FetchError>;
}

// Returns the absolute `http://` / `https://` hrefs of a page,
// in document order, duplicates included.
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, page: &str) -> Vec<String>;
}
