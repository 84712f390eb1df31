// src/crawl/engine.rs
// =============================================================================
// This module implements the crawl traversal engine.
//
// How it works:
// 1. Start with the seed URL in a frontier of (url, depth) pairs
// 2. Pop a page, mark it visited, and check its own reachability
// 3. Fetch the page HTML and extract its links
// 4. Check every extracted link's reachability
// 5. Push the links back onto the frontier one level deeper
// 6. Repeat until the frontier is empty, the depth limit prunes everything,
//    or the global URL budget runs out
//
// The link graph is dynamically discovered and can contain cycles, so the
// visited set is the cycle guard and max_urls is the global safety valve.
// The frontier is an explicit stack rather than recursive calls: recursion
// depth would track crawl depth, and a hostile site shouldn't get to choose
// how much call stack we use.
//
// Nothing in this engine is fatal. A failed fetch, parse, or probe becomes
// an Erroring record and the crawl moves on; the only early exits are
// budget/depth exhaustion and cooperative cancellation.
//
// Politeness:
// - Waits a configurable delay after each probe to avoid hammering servers
//
// Rust concepts:
// - HashSet: To track visited/checked URLs (O(1) lookup)
// - Vec as a stack: pop/push for depth-first traversal
// - Arc<AtomicBool>: A cancellation flag shared with a signal handler
// =============================================================================

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::records::{ErrorPhase, LinkOutcome, LinkRecord};
use crate::checker::{extract_links, is_valid_url, url_authority, PageFetcher, StatusProber};
use crate::report::{ScanInfo, ScanReport, ScanResults, ScanStats};

// Limits and knobs for one crawl session
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Global budget: stop after this many reachability checks
    pub max_urls: usize,
    /// How many link hops away from the seed to expand pages
    pub max_depth: usize,
    /// Politeness delay after each check
    pub delay: Duration,
    /// Only follow links whose authority equals the seed's authority
    pub same_origin_only: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_urls: 100,
            max_depth: 2,
            delay: Duration::from_secs(1),
            same_origin_only: true,
        }
    }
}

// The crawl engine owns every piece of traversal state
//
// All of it is created fresh per session, mutated only while crawl() runs,
// and read out once at the end via into_report().
pub struct CrawlEngine {
    config: CrawlConfig,
    fetcher: PageFetcher,
    prober: StatusProber,

    /// Pages that have been expanded (had their links extracted)
    visited: HashSet<String>,
    /// URLs that already have an outcome - the gate that makes checking
    /// idempotent and keeps every URL in at most one outcome list
    checked: HashSet<String>,
    /// One record per checked URL
    records: Vec<LinkRecord>,
    /// Authority of the seed URL, captured on the first visit and fixed
    /// for the whole session
    origin: Option<String>,
    /// Number of probes issued; gates the global budget
    urls_processed: usize,

    started_at: DateTime<Utc>,
    cancelled: Arc<AtomicBool>,
}

impl CrawlEngine {
    pub fn new(config: CrawlConfig, fetcher: PageFetcher, prober: StatusProber) -> Self {
        Self {
            config,
            fetcher,
            prober,
            visited: HashSet::new(),
            checked: HashSet::new(),
            records: Vec::new(),
            origin: None,
            urls_processed: 0,
            started_at: Utc::now(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    // The cancellation flag, for wiring up to a Ctrl-C handler
    //
    // Once the flag is set the engine issues no new requests and crawl()
    // returns with whatever has been recorded so far.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    // Crawls the link graph starting from start_url
    //
    // Returns Err only if the seed URL itself is unusable (no scheme or no
    // host). Every failure after that is contained as an Erroring record.
    pub async fn crawl(&mut self, start_url: &str) -> Result<()> {
        // A URL without both a scheme and a host never enters any set -
        // and a seed that fails the rule means there's nothing to scan
        if !is_valid_url(start_url) {
            return Err(anyhow!(
                "Invalid URL '{}': expected an absolute URL with a scheme and a host",
                start_url
            ));
        }
        let seed = Url::parse(start_url)
            .map_err(|e| anyhow!("Invalid URL '{}': {}", start_url, e))?;

        // Explicit frontier instead of recursion; pushing/popping from the
        // back keeps the walk depth-first, and sibling order was never
        // guaranteed to begin with
        let mut frontier: Vec<(String, usize)> = vec![(seed.to_string(), 0)];

        while let Some((url, depth)) = frontier.pop() {
            if self.is_cancelled() {
                break;
            }
            if self.urls_processed >= self.config.max_urls {
                break;
            }
            // Defensive: nothing deeper than max_depth is ever pushed, but
            // the guard keeps that an invariant of the loop, not of callers
            if depth > self.config.max_depth {
                continue;
            }
            // Cycle/revisit guard - insert returns false if already present
            if !self.visited.insert(url.clone()) {
                continue;
            }

            // The first visited page fixes the origin for the whole session,
            // whether or not origin filtering is enabled
            if self.origin.is_none() {
                if let Ok(parsed) = Url::parse(&url) {
                    self.origin = url_authority(&parsed);
                }
            }

            println!("\n[🕷️ ] Crawling (depth {}): {}", depth, url);

            // Every visited page is itself checked
            self.check_url(&url).await;

            if self.urls_processed >= self.config.max_urls {
                println!(
                    "\n[*] Reached maximum URL limit ({}). Stopping crawl.",
                    self.config.max_urls
                );
                continue;
            }

            // Discover this page's links (empty on fetch failure)
            let links = self.discover_links(&url).await;

            // Check each link found on the page, stopping the moment the
            // budget runs out
            for link in &links {
                if self.urls_processed >= self.config.max_urls || self.is_cancelled() {
                    break;
                }
                self.check_url(link).await;
            }

            // Queue the links for expansion one level deeper
            if depth < self.config.max_depth {
                for link in links {
                    frontier.push((link, depth + 1));
                }
            }
        }

        Ok(())
    }

    // Checks one URL's reachability - idempotent per session
    //
    // The checked-set insert is the no-op gate: a URL that already has an
    // outcome is never probed again and never recorded again.
    async fn check_url(&mut self, url: &str) {
        if !self.checked.insert(url.to_string()) {
            return;
        }
        self.urls_processed += 1;

        println!(
            "[{}/{}] Checking: {}",
            self.urls_processed, self.config.max_urls, url
        );

        match self.prober.probe(url).await {
            Ok(probe) => {
                if probe.status_code >= 400 {
                    println!("  ❌ [BROKEN] Status code: {}", probe.status_code);
                } else {
                    println!("  ✅ [OK] Status code: {}", probe.status_code);
                }
                self.records.push(LinkRecord::from_probe(url, probe));
            }
            Err(e) => {
                println!("  ⚠️  [ERROR] {}", e);
                self.records
                    .push(LinkRecord::erroring(url, e.to_string(), ErrorPhase::Check));
            }
        }

        // Add delay to be respectful to the server (skipped once cancelled,
        // so an interrupt doesn't wait out the timer)
        if !self.config.delay.is_zero() && !self.is_cancelled() {
            tokio::time::sleep(self.config.delay).await;
        }
    }

    // Fetches a page and extracts its links
    //
    // A fetch failure degrades to an empty link set plus (at most) one
    // extraction-phase Erroring record; the crawl continues either way.
    async fn discover_links(&mut self, url: &str) -> Vec<String> {
        if self.is_cancelled() {
            return Vec::new();
        }

        println!("[*] Extracting links from: {}", url);

        match self.fetcher.fetch(url).await {
            Ok(body) => {
                let origin = if self.config.same_origin_only {
                    self.origin.as_deref()
                } else {
                    None
                };
                extract_links(&body, url, origin).into_iter().collect()
            }
            Err(e) => {
                eprintln!("[!] Error getting links from {}: {}", url, e);
                self.record_extraction_error(url, e.to_string());
                Vec::new()
            }
        }
    }

    // Records an extraction failure, through the same gate as probe outcomes
    //
    // A URL that already has an outcome (the usual case: the page was checked
    // right before its body fetch) keeps that outcome; one URL never occupies
    // two outcome lists.
    fn record_extraction_error(&mut self, url: &str, error: String) {
        if !self.checked.insert(url.to_string()) {
            return;
        }
        self.records
            .push(LinkRecord::erroring(url, error, ErrorPhase::Extraction));
    }

    /// Number of reachability probes issued so far
    pub fn urls_processed(&self) -> usize {
        self.urls_processed
    }

    /// The captured seed authority, if the crawl has started
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// All recorded outcomes, in the order they were recorded
    pub fn records(&self) -> &[LinkRecord] {
        &self.records
    }

    // Consumes the engine and freezes its state into the report snapshot
    //
    // This is the only way results leave the engine, so the snapshot is
    // immutable by construction.
    pub fn into_report(self) -> ScanReport {
        let end_time = Utc::now();
        let duration = (end_time - self.started_at).num_milliseconds() as f64 / 1000.0;

        let mut working_links = Vec::new();
        let mut broken_links = Vec::new();
        let mut error_links = Vec::new();
        for record in self.records {
            match record.outcome {
                LinkOutcome::Working { .. } => working_links.push(record),
                LinkOutcome::Broken { .. } => broken_links.push(record),
                LinkOutcome::Erroring { .. } => error_links.push(record),
            }
        }

        ScanReport {
            scan_info: ScanInfo {
                start_time: self.started_at,
                end_time,
                duration_seconds: (duration * 100.0).round() / 100.0,
                start_origin: self.origin,
                max_urls: self.config.max_urls,
                max_depth: self.config.max_depth,
                delay_seconds: self.config.delay.as_secs_f64(),
                same_origin_only: self.config.same_origin_only,
            },
            statistics: ScanStats {
                total_urls_processed: self.urls_processed,
                working_links_count: working_links.len(),
                broken_links_count: broken_links.len(),
                error_links_count: error_links.len(),
                visited_pages_count: self.visited.len(),
            },
            results: ScanResults {
                working_links,
                broken_links,
                error_links,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::HttpConfig;

    // Engine wired for tests: no politeness delay, small budget
    fn test_engine(config: CrawlConfig) -> CrawlEngine {
        let http = HttpConfig::default();
        let fetcher = PageFetcher::new(&http).unwrap();
        let prober = StatusProber::new(&http).unwrap();
        CrawlEngine::new(config, fetcher, prober)
    }

    fn no_delay_config() -> CrawlConfig {
        CrawlConfig {
            delay: Duration::ZERO,
            ..CrawlConfig::default()
        }
    }

    #[tokio::test]
    async fn test_check_url_is_idempotent() {
        let mut server = mockito::Server::new_async().await;
        // expect(1): the mock server itself verifies the probe count
        let mock = server
            .mock("HEAD", "/page")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let mut engine = test_engine(no_delay_config());
        let url = format!("{}/page", server.url());

        engine.check_url(&url).await;
        engine.check_url(&url).await;

        mock.assert_async().await;
        assert_eq!(engine.urls_processed(), 1);
        assert_eq!(engine.records().len(), 1);
    }

    #[tokio::test]
    async fn test_check_url_transport_failure_becomes_erroring_record() {
        let mut engine = test_engine(no_delay_config());

        engine.check_url("http://127.0.0.1:1/unreachable").await;

        assert_eq!(engine.records().len(), 1);
        let record = &engine.records()[0];
        assert!(record.is_erroring());
        match &record.outcome {
            LinkOutcome::Erroring { phase, .. } => assert_eq!(*phase, ErrorPhase::Check),
            other => panic!("expected erroring outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_redirect_records_final_url() {
        let mut server = mockito::Server::new_async().await;
        let _old = server
            .mock("HEAD", "/old")
            .with_status(302)
            .with_header("location", "/new")
            .create_async()
            .await;
        let _new = server
            .mock("HEAD", "/new")
            .with_status(200)
            .create_async()
            .await;

        let mut engine = test_engine(no_delay_config());
        engine.check_url(&format!("{}/old", server.url())).await;

        let record = &engine.records()[0];
        assert!(record.is_working());
        match &record.outcome {
            LinkOutcome::Working { final_url, .. } => assert!(final_url.ends_with("/new")),
            other => panic!("expected working outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extraction_failure_degrades_to_empty_set() {
        let mut engine = test_engine(no_delay_config());

        // Nothing listens on port 1: the fetch fails at the transport level
        let links = engine.discover_links("http://127.0.0.1:1/page").await;

        assert!(links.is_empty());
        assert_eq!(engine.records().len(), 1);
        let record = &engine.records()[0];
        match &record.outcome {
            LinkOutcome::Erroring { phase, .. } => assert_eq!(*phase, ErrorPhase::Extraction),
            other => panic!("expected extraction error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extraction_failure_never_double_records_a_url() {
        let mut server = mockito::Server::new_async().await;
        let _head = server
            .mock("HEAD", "/page")
            .with_status(200)
            .create_async()
            .await;

        // Crawl order in practice: a page is checked first, then its body
        // is fetched. If the fetch fails afterwards, the extraction error
        // must not give the page a second outcome.
        let mut engine = test_engine(no_delay_config());
        let url = format!("{}/page", server.url());
        engine.check_url(&url).await;
        assert_eq!(engine.records().len(), 1);

        engine.record_extraction_error(&url, "boom".to_string());

        // Still exactly one outcome for that URL - the extraction error
        // was suppressed by the checked-set gate
        assert_eq!(engine.records().len(), 1);
        assert!(engine.records()[0].is_working());
    }

    #[tokio::test]
    async fn test_crawl_rejects_invalid_seed() {
        let mut engine = test_engine(no_delay_config());
        assert!(engine.crawl("not-a-url").await.is_err());
        assert!(engine.crawl("//example.com").await.is_err());
        assert_eq!(engine.urls_processed(), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_classification() {
        let mut server = mockito::Server::new_async().await;
        let _seed_head = server
            .mock("HEAD", "/")
            .with_status(200)
            .create_async()
            .await;
        let _seed_get = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(r#"<a href="/working">ok</a><a href="/broken">dead</a>"#)
            .create_async()
            .await;
        let _working = server
            .mock("HEAD", "/working")
            .with_status(200)
            .create_async()
            .await;
        let _broken = server
            .mock("HEAD", "/broken")
            .with_status(404)
            .create_async()
            .await;

        let mut engine = test_engine(CrawlConfig {
            max_urls: 10,
            max_depth: 1,
            delay: Duration::ZERO,
            same_origin_only: true,
        });
        engine.crawl(&server.url()).await.unwrap();

        assert_eq!(engine.urls_processed(), 3);

        let report = engine.into_report();
        assert_eq!(report.statistics.working_links_count, 2);
        assert_eq!(report.statistics.broken_links_count, 1);
        assert_eq!(report.statistics.error_links_count, 0);
        assert!(report
            .results
            .working_links
            .iter()
            .any(|r| r.url.ends_with("/working")));
        assert!(report
            .results
            .broken_links
            .iter()
            .any(|r| r.url.ends_with("/broken")));
    }

    #[tokio::test]
    async fn test_each_url_has_at_most_one_outcome() {
        let mut server = mockito::Server::new_async().await;
        // Every page links back to the seed and to each other: a cyclic
        // graph that would loop forever without the visited/checked gates
        let _seed_head = server
            .mock("HEAD", "/")
            .with_status(200)
            .create_async()
            .await;
        let _seed_get = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(r#"<a href="/a">a</a><a href="/b">b</a>"#)
            .create_async()
            .await;
        let _a_head = server.mock("HEAD", "/a").with_status(200).create_async().await;
        let _a_get = server
            .mock("GET", "/a")
            .with_status(200)
            .with_body(r#"<a href="/">home</a><a href="/b">b</a>"#)
            .create_async()
            .await;
        let _b_head = server.mock("HEAD", "/b").with_status(410).create_async().await;
        let _b_get = server
            .mock("GET", "/b")
            .with_status(410)
            .with_body(r#"<a href="/a">a</a>"#)
            .create_async()
            .await;

        let mut engine = test_engine(CrawlConfig {
            max_urls: 50,
            max_depth: 3,
            delay: Duration::ZERO,
            same_origin_only: true,
        });
        engine.crawl(&server.url()).await.unwrap();

        let report = engine.into_report();
        let mut seen = HashSet::new();
        let all = report
            .results
            .working_links
            .iter()
            .chain(report.results.broken_links.iter())
            .chain(report.results.error_links.iter());
        for record in all {
            assert!(
                seen.insert(record.url.clone()),
                "URL recorded twice: {}",
                record.url
            );
        }
    }

    #[tokio::test]
    async fn test_budget_is_respected() {
        let mut server = mockito::Server::new_async().await;
        let links: String = (0..20)
            .map(|i| format!(r#"<a href="/page{}">p</a>"#, i))
            .collect();
        let _seed_head = server
            .mock("HEAD", "/")
            .with_status(200)
            .create_async()
            .await;
        let _seed_get = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(links)
            .create_async()
            .await;
        // Any /pageN probe succeeds
        let _pages = server
            .mock("HEAD", mockito::Matcher::Regex(r"^/page\d+$".to_string()))
            .with_status(200)
            .create_async()
            .await;

        let max_urls = 5;
        let mut engine = test_engine(CrawlConfig {
            max_urls,
            max_depth: 2,
            delay: Duration::ZERO,
            same_origin_only: true,
        });
        engine.crawl(&server.url()).await.unwrap();

        // The budget holds even though the seed page alone offered 20 links
        assert!(engine.urls_processed() <= max_urls);
        assert_eq!(engine.urls_processed(), max_urls);
    }

    #[tokio::test]
    async fn test_same_origin_excludes_other_authorities() {
        let mut server = mockito::Server::new_async().await;
        // A second server = a different port = a different authority
        let mut other = mockito::Server::new_async().await;
        let external = other
            .mock("HEAD", "/external")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let _seed_head = server
            .mock("HEAD", "/")
            .with_status(200)
            .create_async()
            .await;
        let body = format!(
            r#"<a href="/local">local</a><a href="{}/external">external</a>"#,
            other.url()
        );
        let _seed_get = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;
        let _local = server
            .mock("HEAD", "/local")
            .with_status(200)
            .create_async()
            .await;

        let mut engine = test_engine(CrawlConfig {
            max_urls: 10,
            max_depth: 1,
            delay: Duration::ZERO,
            same_origin_only: true,
        });
        engine.crawl(&server.url()).await.unwrap();

        // The cross-origin link was filtered before it could be probed
        external.assert_async().await;
        assert_eq!(engine.urls_processed(), 2);
    }

    #[tokio::test]
    async fn test_origin_captured_from_seed() {
        let mut server = mockito::Server::new_async().await;
        let _head = server.mock("HEAD", "/").with_status(200).create_async().await;
        let _get = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("<p>no links</p>")
            .create_async()
            .await;

        let mut engine = test_engine(no_delay_config());
        engine.crawl(&server.url()).await.unwrap();

        let seed = Url::parse(&server.url()).unwrap();
        assert_eq!(engine.origin(), url_authority(&seed).as_deref());
    }

    #[tokio::test]
    async fn test_depth_zero_checks_links_but_never_expands_them() {
        let mut server = mockito::Server::new_async().await;
        let _seed_head = server
            .mock("HEAD", "/")
            .with_status(200)
            .create_async()
            .await;
        let _seed_get = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(r#"<a href="/a">a</a>"#)
            .create_async()
            .await;
        let _a_head = server.mock("HEAD", "/a").with_status(200).create_async().await;
        // If /a were expanded, this GET would fire
        let a_get = server
            .mock("GET", "/a")
            .with_status(200)
            .with_body(r#"<a href="/b">b</a>"#)
            .expect(0)
            .create_async()
            .await;

        let mut engine = test_engine(CrawlConfig {
            max_urls: 10,
            max_depth: 0,
            delay: Duration::ZERO,
            same_origin_only: true,
        });
        engine.crawl(&server.url()).await.unwrap();

        // Leaf URLs are checked but only expanded if depth allows
        a_get.assert_async().await;
        assert_eq!(engine.urls_processed(), 2);
    }

    #[tokio::test]
    async fn test_cancellation_stops_new_requests() {
        let mut server = mockito::Server::new_async().await;
        let head = server
            .mock("HEAD", "/")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let mut engine = test_engine(no_delay_config());
        engine.cancel_flag().store(true, Ordering::Relaxed);
        engine.crawl(&server.url()).await.unwrap();

        head.assert_async().await;
        assert_eq!(engine.urls_processed(), 0);

        // Even a cancelled crawl yields a well-formed report
        let report = engine.into_report();
        assert_eq!(report.statistics.total_urls_processed, 0);
    }
}
