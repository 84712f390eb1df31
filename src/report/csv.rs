// src/report/csv.rs
// =============================================================================
// CSV report renderer.
//
// Writes one row per recorded link across all three outcome lists, with a
// shared column set. Columns that don't apply to a record kind are left
// empty (e.g. error/type for working links, status_code for errors).
// =============================================================================

use anyhow::{Context, Result};
use std::path::Path;

use crate::crawl::{LinkOutcome, LinkRecord};

use super::ScanReport;

// The shared column set for all record kinds
const HEADERS: [&str; 7] = [
    "url",
    "status",
    "status_code",
    "final_url",
    "error",
    "type",
    "timestamp",
];

// Saves the report to a CSV file
//
// Parameters:
//   report: the finished scan snapshot
//   path: where to write the file
pub fn save_csv_report(report: &ScanReport, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV report at {}", path.display()))?;

    writer.write_record(HEADERS)?;

    // Working, then broken, then errors - same order as the JSON lists
    for record in report
        .results
        .working_links
        .iter()
        .chain(report.results.broken_links.iter())
        .chain(report.results.error_links.iter())
    {
        writer.write_record(csv_row(record))?;
    }

    writer.flush()?;

    println!("\n📊 CSV report saved to: {}", path.display());
    Ok(())
}

// Flattens one record into the shared column set
fn csv_row(record: &LinkRecord) -> [String; 7] {
    let timestamp = record.timestamp.to_rfc3339();
    match &record.outcome {
        LinkOutcome::Working {
            status_code,
            final_url,
        } => [
            record.url.clone(),
            "working".to_string(),
            status_code.to_string(),
            final_url.clone(),
            String::new(),
            String::new(),
            timestamp,
        ],
        LinkOutcome::Broken {
            status_code,
            final_url,
        } => [
            record.url.clone(),
            "broken".to_string(),
            status_code.to_string(),
            final_url.clone(),
            String::new(),
            String::new(),
            timestamp,
        ],
        LinkOutcome::Erroring { error, phase } => [
            record.url.clone(),
            "error".to_string(),
            String::new(),
            String::new(),
            error.clone(),
            phase.as_str().to_string(),
            timestamp,
        ],
    }
}
