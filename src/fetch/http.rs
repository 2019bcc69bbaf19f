// src/fetch/http.rs
// =============================================================================
// This module downloads pages over HTTP(S).
//
// Key functionality:
// - One GET request per page, never retried
// - The per-request timeout bounds the whole round trip (connect + body)
// - Non-2xx answers count as failures
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Traits: HttpFetcher is one implementation of PageFetcher; tests plug in
//   their own fake implementation instead
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::PageFetcher;
use crate::error::FetchError;

const USER_AGENT: &str = concat!("domain-crawler/", env!("CARGO_PKG_VERSION"));

// The real page fetcher, backed by a reqwest client
//
// Client is cheap to clone (it's an Arc internally) and keeps a connection
// pool, so one HttpFetcher is shared by every crawl task.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Option<Duration>) -> Result<String, FetchError> {
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let page = response.text().await?;
        Ok(page)
    }
}
