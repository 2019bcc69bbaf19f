// src/crawl/validate.rs
// =============================================================================
// URL validation and domain extraction.
//
// Every URL the crawler touches goes through parse_url() first:
// - the seed URL (a failure here aborts the crawl)
// - every link found on a page (a failure here just skips that link)
//
// The "domain" we deduplicate on is the bare hostname:
//   https://Example.com:8080/docs?x=1  ->  example.com
//   http://[::1]:3000/                 ->  ::1
// =============================================================================

use url::{Host, Url};

use crate::error::UrlError;

// A URL that has passed validation: it is absolute and has both a scheme
// and a host.
#[derive(Debug, Clone)]
pub struct ParsedUrl {
    url: Url,
}

impl ParsedUrl {
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> &str {
        // parse_url() guarantees a host is present
        self.url.host_str().unwrap_or_default()
    }

    // Hostname only: no scheme, port, path or IPv6 brackets.
    // The url crate already lowercases domain names.
    pub fn domain(&self) -> String {
        match self.url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => String::new(),
        }
    }
}

// Parses a string into a ParsedUrl
//
// Fails when:
// - the string is not an absolute URL ("not a url", "/relative")
// - the host is empty ("mailto:x@a.com" has no host)
pub fn parse_url(input: &str) -> Result<ParsedUrl, UrlError> {
    // Url::parse only accepts absolute URLs, so a parsed URL always
    // has a scheme; only the host still needs checking
    let url = Url::parse(input)?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(ParsedUrl { url }),
        _ => Err(UrlError::MissingHost),
    }
}
