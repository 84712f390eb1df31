// src/report/mod.rs
// =============================================================================
// This module is the read-only result snapshot and its renderers.
//
// The crawl engine freezes its state into a ScanReport when it finishes.
// That snapshot - configuration, timing, counters, and the three outcome
// lists - is the *only* surface any renderer sees. The JSON file writer,
// the CSV file writer, and the terminal summary all consume the same
// struct; none of them reach back into the engine.
//
// Submodules:
// - json: Pretty-printed JSON report file
// - csv: Flat CSV report file (one row per record)
// =============================================================================

mod csv;
mod json;

pub use self::csv::save_csv_report;
pub use self::json::save_json_report;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::crawl::LinkRecord;

// The configuration and timing of one finished scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanInfo {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: f64,
    /// Authority of the seed URL (host[:port]); None if the crawl never
    /// visited a page
    pub start_origin: Option<String>,
    pub max_urls: usize,
    pub max_depth: usize,
    pub delay_seconds: f64,
    pub same_origin_only: bool,
}

// Aggregate counters for one finished scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanStats {
    pub total_urls_processed: usize,
    pub working_links_count: usize,
    pub broken_links_count: usize,
    pub error_links_count: usize,
    pub visited_pages_count: usize,
}

// The three outcome lists, verbatim as recorded
#[derive(Debug, Clone, Serialize)]
pub struct ScanResults {
    pub working_links: Vec<LinkRecord>,
    pub broken_links: Vec<LinkRecord>,
    pub error_links: Vec<LinkRecord>,
}

// Everything a report renderer needs, in one immutable value
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scan_info: ScanInfo,
    pub statistics: ScanStats,
    pub results: ScanResults,
}

impl ScanReport {
    /// True if the scan found anything wrong (broken or erroring links)
    pub fn has_failures(&self) -> bool {
        !self.results.broken_links.is_empty() || !self.results.error_links.is_empty()
    }
}
