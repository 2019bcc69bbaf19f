// src/crawl/engine.rs
// =============================================================================
// This module implements the level-synchronized, breadth-first crawl.
//
// How it works:
// 1. Validate the seed URL and register its domain
// 2. frontier = [seed]
// 3. For each level 1..=max_depth:
//    - spawn one task per frontier URL
//    - each task fetches its page, extracts links, and keeps only the links
//      whose domain has never been seen before
//    - wait for EVERY task of the level (the barrier)
//    - the links the tasks kept become the next frontier
//
// Shared state:
// - DomainRegistry: every domain seen so far (check-and-insert is atomic)
// - the next-frontier Vec of the current level, behind a mutex
// Nothing else is shared; each task gets its own URL.
//
// Failures inside a task (network error, timeout, bad link, even a panic)
// only make that task contribute nothing. The only crawl-wide failure is an
// invalid seed URL.
// =============================================================================

use futures::future::join_all;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::registry::DomainRegistry;
use super::validate::parse_url;
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::fetch::{HtmlLinkExtractor, HttpFetcher, LinkExtractor, PageFetcher};

// Counters for reporting only; they never steer the crawl
#[derive(Debug, Default)]
struct Counters {
    levels_completed: AtomicUsize,
    pages_fetched: AtomicUsize,
    fetch_failures: AtomicUsize,
    links_skipped: AtomicUsize,
}

// Snapshot of what a crawl did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub levels_completed: usize,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    pub links_skipped: usize,
    pub domains_visited: usize,
}

// Everything a crawl task needs, shared between all tasks through one Arc
struct Shared {
    registry: DomainRegistry,
    counters: Counters,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn LinkExtractor>,
    timeout: Option<Duration>,
}

// A single crawl: its configuration, its collaborators and its results
//
// Every crawl owns its own registry, so several crawlers can run side by
// side in one process.
pub struct Crawler {
    config: CrawlConfig,
    shared: Arc<Shared>,
}

impl Crawler {
    pub fn new(
        config: CrawlConfig,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Self {
        let shared = Shared {
            registry: DomainRegistry::new(),
            counters: Counters::default(),
            fetcher,
            extractor,
            timeout: config.fetch_timeout(),
        };

        Self {
            config,
            shared: Arc::new(shared),
        }
    }

    // Builds a crawler that fetches over real HTTP and parses real HTML
    pub fn with_http(config: CrawlConfig) -> Result<Self, reqwest::Error> {
        let fetcher = HttpFetcher::new()?;
        Ok(Self::new(
            config,
            Arc::new(fetcher),
            Arc::new(HtmlLinkExtractor::new()),
        ))
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    // Runs the whole crawl and returns once the last level has finished
    //
    // Returns: Err only if the seed URL is invalid; in that case nothing was
    // fetched and no domain was recorded.
    pub async fn crawl(&self) -> Result<(), CrawlError> {
        let seed_url = &self.config.seed_url;
        // A bad seed is the only error the caller ever sees;
        // it is reported once, by whoever handles the Err
        let seed = parse_url(seed_url).map_err(|source| CrawlError::InvalidSeed {
            url: seed_url.clone(),
            source,
        })?;

        // The seed's domain counts as visited before any fetch happens
        self.shared.registry.insert_if_absent(&seed.domain());

        let mut frontier = vec![seed_url.clone()];

        for level in 1..=self.config.max_depth {
            // Nothing new was discovered last level, so every remaining
            // level would be empty too
            if frontier.is_empty() {
                debug!(level, "frontier is empty, stopping early");
                break;
            }

            info!(level, frontier = frontier.len(), "crawling level");

            // The next frontier replaces this one wholesale
            frontier = self.crawl_level(level, frontier).await;
            self.shared
                .counters
                .levels_completed
                .fetch_add(1, Ordering::Relaxed);
            info!(
                level,
                discovered = frontier.len(),
                domains = self.shared.registry.len(),
                "level complete"
            );
        }

        Ok(())
    }

    // Fetches every URL of one level concurrently and returns the next frontier
    async fn crawl_level(&self, level: usize, frontier: Vec<String>) -> Vec<String> {
        // Fresh accumulator for this level; every task appends to it
        let next_frontier = Arc::new(Mutex::new(Vec::new()));

        // One task per URL, no cap: the fan-out is the frontier size
        let tasks: Vec<_> = frontier
            .into_iter()
            .map(|url| {
                // Each task gets its own handles (Arc clones are cheap)
                let shared = self.shared.clone();
                let next_frontier = next_frontier.clone();
                tokio::spawn(async move {
                    let batch = shared.fetch_unique_urls(&url).await;
                    // Lock only for the append, never across an .await
                    next_frontier.lock().extend(batch);
                })
            })
            .collect();

        // Barrier: nothing from the next level starts before all of these end
        for result in join_all(tasks).await {
            // Err here means the task panicked; its batch is simply lost
            if let Err(e) = result {
                warn!(level, error = %e, "crawl task did not finish");
            }
        }

        // All tasks are done, so nobody else holds the lock anymore
        let mut next_frontier = next_frontier.lock();
        std::mem::take(&mut *next_frontier)
    }

    // Every domain visited so far, sorted
    //
    // Only complete once crawl() has returned
    pub fn visited_domains(&self) -> Vec<String> {
        self.shared.registry.domains()
    }

    pub fn stats(&self) -> CrawlStats {
        let counters = &self.shared.counters;
        CrawlStats {
            levels_completed: counters.levels_completed.load(Ordering::Relaxed),
            pages_fetched: counters.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: counters.fetch_failures.load(Ordering::Relaxed),
            links_skipped: counters.links_skipped.load(Ordering::Relaxed),
            domains_visited: self.shared.registry.len(),
        }
    }
}

impl Shared {
    // One crawl task: fetch a page and keep the links that lead to new domains
    async fn fetch_unique_urls(&self, url: &str) -> Vec<String> {
        let page = match self.fetcher.fetch(url, self.timeout).await {
            Ok(page) => page,
            Err(e) => {
                self.counters.fetch_failures.fetch_add(1, Ordering::Relaxed);
                warn!(url, error = %e, "failed to fetch page");
                return Vec::new();
            }
        };
        self.counters.pages_fetched.fetch_add(1, Ordering::Relaxed);

        let links = self.extractor.extract_links(&page);
        let found = links.len();

        let mut unique_urls = Vec::new();
        for link in links {
            let parsed = match parse_url(&link) {
                Ok(parsed) => parsed,
                Err(e) => {
                    self.counters.links_skipped.fetch_add(1, Ordering::Relaxed);
                    debug!(url, link = %link, error = %e, "skipping invalid link");
                    continue;
                }
            };

            if self.registry.insert_if_absent(&parsed.domain()) {
                unique_urls.push(link);
            }
        }

        debug!(url, found, new_domains = unique_urls.len(), "page crawled");
        unique_urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};

    // What the fake web serves for a URL
    enum FakePage {
        Html(String),
        Fail,
        Panic,
    }

    // One fetch, with its start and end stamped from a shared counter
    #[derive(Debug, Clone)]
    struct FetchEvent {
        url: String,
        timeout: Option<Duration>,
        started: usize,
        finished: usize,
    }

    // In-memory web: canned pages, optional per-URL delays, and a log of
    // every fetch in the order it happened
    #[derive(Default)]
    struct FakeWeb {
        pages: HashMap<String, FakePage>,
        delays: HashMap<String, Duration>,
        clock: AtomicUsize,
        events: Mutex<Vec<FetchEvent>>,
    }

    impl FakeWeb {
        fn page(mut self, url: &str, links: &[&str]) -> Self {
            let body: String = links
                .iter()
                .map(|link| format!(r#"<a href="{link}">{link}</a>"#))
                .collect();
            self.pages.insert(
                url.to_string(),
                FakePage::Html(format!("<html><body>{body}</body></html>")),
            );
            self
        }

        fn failing(mut self, url: &str) -> Self {
            self.pages.insert(url.to_string(), FakePage::Fail);
            self
        }

        fn panicking(mut self, url: &str) -> Self {
            self.pages.insert(url.to_string(), FakePage::Panic);
            self
        }

        fn delayed(mut self, url: &str, millis: u64) -> Self {
            self.delays
                .insert(url.to_string(), Duration::from_millis(millis));
            self
        }

        fn events(&self) -> Vec<FetchEvent> {
            self.events.lock().clone()
        }

        fn fetched_urls(&self) -> HashSet<String> {
            self.events().into_iter().map(|e| e.url).collect()
        }
    }

    #[async_trait]
    impl PageFetcher for FakeWeb {
        async fn fetch(&self, url: &str, timeout: Option<Duration>) -> Result<String, FetchError> {
            let started = self.clock.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(url) {
                tokio::time::sleep(*delay).await;
            }
            let finished = self.clock.fetch_add(1, Ordering::SeqCst);
            self.events.lock().push(FetchEvent {
                url: url.to_string(),
                timeout,
                started,
                finished,
            });

            match self.pages.get(url) {
                Some(FakePage::Html(html)) => Ok(html.clone()),
                Some(FakePage::Panic) => panic!("fake fetcher blew up on {url}"),
                Some(FakePage::Fail) | None => Err(FetchError::Status(404)),
            }
        }
    }

    fn crawler(web: &Arc<FakeWeb>, seed: &str, max_depth: usize) -> Crawler {
        let config = CrawlConfig::new(seed).with_max_depth(max_depth);
        Crawler::new(config, web.clone(), Arc::new(HtmlLinkExtractor::new()))
    }

    // seed -> 3 children -> 3 grandchildren each, all on distinct domains
    fn three_way_tree() -> FakeWeb {
        let mut web = FakeWeb::default().page(
            "https://seed.test/",
            &["https://a.test/", "https://b.test/", "https://c.test/"],
        );
        for child in ["a", "b", "c"] {
            let grandchildren: Vec<String> = (1..=3)
                .map(|n| format!("https://{child}{n}.test/"))
                .collect();
            let links: Vec<&str> = grandchildren.iter().map(String::as_str).collect();
            web = web.page(&format!("https://{child}.test/"), &links);
        }
        web
    }

    #[tokio::test]
    async fn test_invalid_seed_aborts_before_fetching() {
        let web = Arc::new(FakeWeb::default());
        let crawler = crawler(&web, "not a url", 3);

        let result = crawler.crawl().await;

        assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));
        assert!(crawler.visited_domains().is_empty());
        assert!(web.events().is_empty());
    }

    #[tokio::test]
    async fn test_depth_zero_visits_only_seed() {
        let web = Arc::new(three_way_tree());
        let crawler = crawler(&web, "https://seed.test/", 0);

        crawler.crawl().await.unwrap();

        assert_eq!(crawler.visited_domains(), vec!["seed.test"]);
        assert!(web.events().is_empty());
        assert_eq!(crawler.stats().levels_completed, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_depth_two_with_three_links_per_page() {
        let web = Arc::new(three_way_tree());
        let crawler = crawler(&web, "https://seed.test/", 2);

        crawler.crawl().await.unwrap();

        // 1 seed + 3 from level 1 + 9 from level 2
        assert_eq!(crawler.visited_domains().len(), 13);
        // Level 1 fetches the seed, level 2 fetches its 3 children
        assert_eq!(web.events().len(), 4);

        let stats = crawler.stats();
        assert_eq!(stats.levels_completed, 2);
        assert_eq!(stats.pages_fetched, 4);
        assert_eq!(stats.domains_visited, 13);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_levels_never_overlap() {
        // a.test is slow; b.test is fast and its child must still wait for a.test
        let web = Arc::new(
            FakeWeb::default()
                .page("https://seed.test/", &["https://a.test/", "https://b.test/"])
                .page("https://a.test/", &["https://d.test/"])
                .page("https://b.test/", &["https://c.test/"])
                .page("https://c.test/", &[])
                .page("https://d.test/", &[])
                .delayed("https://a.test/", 100),
        );
        let crawler = crawler(&web, "https://seed.test/", 3);

        crawler.crawl().await.unwrap();

        let events = web.events();
        let level_2 = ["https://a.test/", "https://b.test/"];
        let level_3 = ["https://c.test/", "https://d.test/"];

        let last_level_2_end = events
            .iter()
            .filter(|e| level_2.contains(&e.url.as_str()))
            .map(|e| e.finished)
            .max()
            .unwrap();
        let first_level_3_start = events
            .iter()
            .filter(|e| level_3.contains(&e.url.as_str()))
            .map(|e| e.started)
            .min()
            .unwrap();

        assert_eq!(events.len(), 5);
        assert!(last_level_2_end < first_level_3_start);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_visited_set_is_deterministic() {
        // Pages share domains, so which task admits x/y/z depends on timing;
        // the final set must not
        let build = || {
            FakeWeb::default()
                .page(
                    "https://seed.test/",
                    &["https://a.test/", "https://b.test/", "https://c.test/"],
                )
                .page("https://a.test/", &["https://x.test/1", "https://y.test/1"])
                .page("https://b.test/", &["https://y.test/2", "https://z.test/2"])
                .page("https://c.test/", &["https://x.test/3", "https://z.test/3"])
                .delayed("https://a.test/", 15)
                .delayed("https://b.test/", 5)
                .delayed("https://c.test/", 10)
        };

        let expected = vec![
            "a.test", "b.test", "c.test", "seed.test", "x.test", "y.test", "z.test",
        ];

        for _ in 0..5 {
            let web = Arc::new(build());
            let crawler = crawler(&web, "https://seed.test/", 3);
            crawler.crawl().await.unwrap();

            assert_eq!(crawler.visited_domains(), expected);
            // One level-3 fetch per newly admitted domain
            assert_eq!(web.events().len(), 1 + 3 + 3);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_fetch_failure_is_isolated() {
        let web = Arc::new(
            FakeWeb::default()
                .page(
                    "https://seed.test/",
                    &["https://a.test/", "https://b.test/", "https://c.test/"],
                )
                .page("https://a.test/", &["https://x.test/"])
                .failing("https://b.test/")
                .page("https://c.test/", &["https://y.test/"])
                .page("https://x.test/", &[])
                .page("https://y.test/", &[]),
        );
        let crawler = crawler(&web, "https://seed.test/", 3);

        crawler.crawl().await.unwrap();

        assert_eq!(
            crawler.visited_domains(),
            vec!["a.test", "b.test", "c.test", "seed.test", "x.test", "y.test"]
        );
        let fetched = web.fetched_urls();
        assert!(fetched.contains("https://x.test/"));
        assert!(fetched.contains("https://y.test/"));

        let stats = crawler.stats();
        assert_eq!(stats.levels_completed, 3);
        assert_eq!(stats.fetch_failures, 1);
        assert_eq!(stats.pages_fetched, 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_task_panic_is_isolated() {
        let web = Arc::new(
            FakeWeb::default()
                .page("https://seed.test/", &["https://a.test/", "https://b.test/"])
                .panicking("https://a.test/")
                .page("https://b.test/", &["https://c.test/"]),
        );
        let crawler = crawler(&web, "https://seed.test/", 2);

        crawler.crawl().await.unwrap();

        assert_eq!(
            crawler.visited_domains(),
            vec!["a.test", "b.test", "c.test", "seed.test"]
        );
    }

    #[tokio::test]
    async fn test_only_first_link_per_domain_is_followed() {
        let web = Arc::new(
            FakeWeb::default()
                .page(
                    "https://seed.test/",
                    &[
                        "https://a.test/one",
                        "https://a.test/two",
                        "https://seed.test/self",
                        "http://",
                    ],
                )
                .page("https://a.test/one", &[]),
        );
        let crawler = crawler(&web, "https://seed.test/", 2);

        crawler.crawl().await.unwrap();

        let fetched = web.fetched_urls();
        assert!(fetched.contains("https://a.test/one"));
        assert!(!fetched.contains("https://a.test/two"));
        assert!(!fetched.contains("https://seed.test/self"));
        assert_eq!(crawler.visited_domains(), vec!["a.test", "seed.test"]);
        assert_eq!(crawler.stats().links_skipped, 1);
    }

    #[tokio::test]
    async fn test_configured_timeout_reaches_every_fetch() {
        let web = Arc::new(three_way_tree());
        let config = CrawlConfig::new("https://seed.test/")
            .with_max_depth(2)
            .with_timeout_secs(7);
        let crawler = Crawler::new(config, web.clone(), Arc::new(HtmlLinkExtractor::new()));

        crawler.crawl().await.unwrap();

        let timeouts: Vec<_> = web.events().into_iter().map(|e| e.timeout).collect();
        assert_eq!(timeouts, vec![Some(Duration::from_secs(7)); 4]);
    }

    #[tokio::test]
    async fn test_zero_timeout_reaches_fetch_as_none() {
        let web = Arc::new(three_way_tree());
        let config = CrawlConfig::new("https://seed.test/")
            .with_max_depth(1)
            .with_timeout_secs(0);
        let crawler = Crawler::new(config, web.clone(), Arc::new(HtmlLinkExtractor::new()));

        crawler.crawl().await.unwrap();

        let events = web.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timeout, None);
    }

    #[tokio::test]
    async fn test_empty_frontier_stops_early() {
        let web = Arc::new(FakeWeb::default().page("https://seed.test/", &[]));
        let crawler = crawler(&web, "https://seed.test/", 10);

        crawler.crawl().await.unwrap();

        assert_eq!(crawler.stats().levels_completed, 1);
        assert_eq!(web.events().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_independent_crawls_in_one_process() {
        let first_web =
            Arc::new(FakeWeb::default().page("https://one.test/", &["https://a.test/"]));
        let second_web =
            Arc::new(FakeWeb::default().page("https://two.test/", &["https://a.test/"]));
        let first = crawler(&first_web, "https://one.test/", 1);
        let second = crawler(&second_web, "https://two.test/", 1);

        let (r1, r2) = tokio::join!(first.crawl(), second.crawl());
        r1.unwrap();
        r2.unwrap();

        // Both discover a.test: the registries are not shared
        assert_eq!(first.visited_domains(), vec!["a.test", "one.test"]);
        assert_eq!(second.visited_domains(), vec!["a.test", "two.test"]);
    }
}
