use serde::Serialize;
use std::path::PathBuf;

use super::size::display_size;

/// A junk target found on this host with a non-zero size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// Label of the catalog entry
    pub label: String,

    /// Resolved location
    pub path: PathBuf,

    /// Total size in bytes, always greater than zero
    pub size_bytes: u64,

    /// Formatted size for display
    pub display_size: String,
}

impl ScanResult {
    pub fn new(label: impl Into<String>, path: PathBuf, size_bytes: u64) -> Self {
        Self {
            label: label.into(),
            path,
            size_bytes,
            display_size: display_size(size_bytes),
        }
    }
}

/// Aggregate figures of one scan run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total_size_bytes: u64,
    pub item_count: usize,
    pub issue_count: usize,
    /// Entries the size counter could not read
    pub skipped_entries: u64,
}

/// Everything a scan hands back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub summary: ScanSummary,
    /// Results in catalog order
    pub results: Vec<ScanResult>,
}
