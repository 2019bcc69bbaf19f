// src/fetch/html.rs
// =============================================================================
// This module extracts outbound links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Only absolute http:// and https:// hrefs on <a> tags are returned.
// Relative links, fragments, mailto:, javascript:, etc. are ignored, and we
// do NOT resolve relative links against the page URL: the crawler only cares
// about links that can point at another domain.
// =============================================================================

use scraper::{Html, Selector};

use super::LinkExtractor;

// The real link extractor, backed by scraper
#[derive(Debug, Clone)]
pub struct HtmlLinkExtractor {
    selector: Selector,
}

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        // "a[href]" is a constant, known-valid selector
        let selector = Selector::parse("a[href]").expect("a[href] is a valid CSS selector");
        Self { selector }
    }
}

impl Default for HtmlLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    // Returns links in document order, duplicates included
    //
    // Example:
    //   <a href="https://a.com/x">  -> kept
    //   <a href="mailto:x@a.com">   -> skipped
    //   <a href="/relative">        -> skipped
    fn extract_links(&self, page: &str) -> Vec<String> {
        let document = Html::parse_document(page);

        document
            .select(&self.selector)
            .filter_map(|element| element.value().attr("href"))
            .filter(|href| is_crawlable_link(href))
            .map(str::to_string)
            .collect()
    }
}

fn is_crawlable_link(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}
