// src/crawl/records.rs
// =============================================================================
// This module defines the outcome recorded for every checked URL.
//
// Each URL the crawler checks ends up as exactly one LinkRecord, and the
// record's outcome is a closed set of three possibilities:
// - Working:  the probe got an HTTP response with status < 400
// - Broken:   the probe got an HTTP response with status >= 400
// - Erroring: no response at all (timeout, DNS failure, refused connection)
//   or the page body couldn't be fetched during link extraction
//
// Instead of three differently-shaped record types, we use one enum with the
// shared fields (url, timestamp) factored into the wrapping struct. The serde
// attributes produce the flat report entry shape:
//   working/broken: {"url", "status": ..., "status_code", "final_url", "timestamp"}
//   erroring:       {"url", "status": "erroring", "error", "type", "timestamp"}
//
// Rust concepts:
// - Enums with data: Each variant carries its own fields
// - #[serde(tag = ...)]: Internally-tagged serialization
// - #[serde(flatten)]: Merge the outcome fields into the record
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checker::ProbeResult;

// Which phase of the crawl produced an error record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPhase {
    /// Fetching the page body for link discovery failed
    Extraction,
    /// The reachability probe itself failed
    Check,
}

impl ErrorPhase {
    // The string used in report columns ("extraction" / "check")
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorPhase::Extraction => "extraction",
            ErrorPhase::Check => "check",
        }
    }
}

// The classification of one checked URL
//
// #[serde(tag = "status")] adds a "status" field naming the variant, so a
// record is self-describing even outside its report list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinkOutcome {
    /// Reachable: the probe got a response below 400
    Working { status_code: u16, final_url: String },
    /// Reachable but failing: the probe got a response of 400 or above
    Broken { status_code: u16, final_url: String },
    /// The request never produced a response
    Erroring {
        error: String,
        #[serde(rename = "type")]
        phase: ErrorPhase,
    },
}

// One outcome per checked URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The URL that was checked
    pub url: String,
    /// What the check concluded
    #[serde(flatten)]
    pub outcome: LinkOutcome,
    /// When the outcome was recorded
    pub timestamp: DateTime<Utc>,
}

impl LinkRecord {
    // Builds a Working or Broken record from a completed probe
    //
    // The 400 threshold is the whole classification rule: anything the server
    // answered with < 400 counts as working (2xx, plus any 3xx that survived
    // redirect following), anything >= 400 is broken.
    pub fn from_probe(url: &str, probe: ProbeResult) -> Self {
        let outcome = if probe.status_code >= 400 {
            LinkOutcome::Broken {
                status_code: probe.status_code,
                final_url: probe.final_url,
            }
        } else {
            LinkOutcome::Working {
                status_code: probe.status_code,
                final_url: probe.final_url,
            }
        };
        Self {
            url: url.to_string(),
            outcome,
            timestamp: Utc::now(),
        }
    }

    // Builds an Erroring record for a failed request
    pub fn erroring(url: &str, error: String, phase: ErrorPhase) -> Self {
        Self {
            url: url.to_string(),
            outcome: LinkOutcome::Erroring { error, phase },
            timestamp: Utc::now(),
        }
    }

    /// Helper to check if this record is a Working outcome
    pub fn is_working(&self) -> bool {
        matches!(self.outcome, LinkOutcome::Working { .. })
    }

    /// Helper to check if this record is a Broken outcome
    pub fn is_broken(&self) -> bool {
        matches!(self.outcome, LinkOutcome::Broken { .. })
    }

    /// Helper to check if this record is an Erroring outcome
    pub fn is_erroring(&self) -> bool {
        matches!(self.outcome, LinkOutcome::Erroring { .. })
    }
}
