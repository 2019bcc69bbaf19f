// src/error.rs
// =============================================================================
// Error types used by the crawler.
//
// We split errors into two groups:
// - Fatal: the seed URL is invalid, so the crawl cannot even start
// - Local: a single page or link failed; the crawl keeps going
//
// Only CrawlError ever reaches the caller of Crawler::crawl().
// UrlError and FetchError are logged and swallowed inside the crawl tasks.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - #[from] / #[source]: chains the underlying error so it shows up in logs
// =============================================================================

use thiserror::Error;

// Why a URL string was rejected by the validator
#[derive(Debug, Error)]
pub enum UrlError {
    // The string could not be parsed as an absolute URL at all
    // (this also covers a missing scheme: "example.com/x" has none)
    #[error("unparsable url: {0}")]
    Parse(#[from] url::ParseError),

    // Parsed, but there is no host (e.g. mailto:, data:)
    #[error("empty url host")]
    MissingHost,
}

// Why fetching a single page failed
#[derive(Debug, Error)]
pub enum FetchError {
    // The request did not finish within the configured timeout
    #[error("request timed out")]
    Timeout,

    // The server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),

    // Anything else reqwest reports (DNS, connection refused, TLS, body read)
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(err)
        }
    }
}

// Errors that abort a whole crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid start url '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: UrlError,
    },
}
