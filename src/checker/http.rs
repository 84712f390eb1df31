// src/checker/http.rs
// =============================================================================
// This module holds the two HTTP collaborators the crawler talks to.
//
// Key functionality:
// - StatusProber: makes HTTP HEAD requests (lightweight, no body download),
//   follows redirects, and reports the final status code + final URL
// - PageFetcher: makes full GET requests to download page HTML for link
//   extraction
// - Both are built from an injected HttpConfig so nothing about the HTTP
//   session (timeout, user agent) is a hardcoded module-level constant, and
//   tests can point them at a local mock server
//
// Rust concepts:
// - async/await: For network I/O
// - Result<T, E>: For error handling
// - Default trait: For the out-of-the-box configuration
// =============================================================================

use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

// Configuration shared by the prober and the fetcher
//
// Injected into both collaborators instead of living as global constants,
// so a test (or a library user) can swap in different settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// How long to wait for any single request before giving up
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            // 10 seconds is enough for slow servers without hanging the scan
            timeout: Duration::from_secs(10),
            // A conventional browser user agent - some servers reject
            // obviously-robotic clients outright
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

// What a reachability probe learned about a URL
//
// final_url is where the request actually landed after any redirect chain,
// which may differ from the URL that was probed.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub status_code: u16,
    pub final_url: String,
}

// Probes URLs with HEAD requests to classify them without downloading bodies
pub struct StatusProber {
    client: Client,
}

impl StatusProber {
    // Builds the prober with its own connection-pooled client
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5)) // Follow up to 5 redirects
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client })
    }

    // Probes a single URL
    //
    // Returns the final status code and final URL on any HTTP response
    // (including 4xx/5xx - classification is the caller's job), or the
    // transport error if the request never completed.
    pub async fn probe(&self, url: &str) -> Result<ProbeResult, reqwest::Error> {
        let response = self.client.head(url).send().await?;
        Ok(ProbeResult {
            status_code: response.status().as_u16(),
            final_url: response.url().to_string(),
        })
    }
}

// Downloads full page bodies for link extraction
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client })
    }

    // Fetches a page and returns its body as text
    //
    // Note: no status check here. Error pages still have bodies, and any
    // links they contain are as real as links on a 200 page.
    pub async fn fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        response.text().await
    }
}
