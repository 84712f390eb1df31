// src/report/json.rs
// =============================================================================
// JSON report renderer.
//
// Serializes the whole ScanReport snapshot to a pretty-printed JSON file.
// The structure on disk mirrors the snapshot exactly: scan_info,
// statistics, and the three result lists.
// =============================================================================

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::ScanReport;

// Saves the report to a JSON file
//
// Parameters:
//   report: the finished scan snapshot
//   path: where to write the file
pub fn save_json_report(report: &ScanReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write JSON report to {}", path.display()))?;

    println!("\n💾 JSON report saved to: {}", path.display());
    Ok(())
}
