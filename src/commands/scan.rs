//! Scan command implementation

use anyhow::Result;
use humansize::{format_size, BINARY};
use serde::Serialize;

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::disk::{fixed_drives, DiskStatus};
use crate::scanner::{ScanReport, ScanResult};
use crate::task::Worker;

use super::{build_scanner, plural, scan_in_background, truncate_path};

/// Run the scan command
pub fn run(args: ScanArgs, config: &Config, quiet: bool) -> Result<()> {
    let scanner = build_scanner(config, &args.targets);
    tracing::info!(targets = scanner.catalog().len(), "Scanning junk locations");

    let report = scan_in_background(&Worker::new(), scanner, quiet || args.json)?;

    let drives = fixed_drives();

    if args.json {
        let output = ScanOutput {
            report: &report,
            drives: &drives,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_report(&report);
    print_drives(&drives);
    Ok(())
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    #[serde(flatten)]
    report: &'a ScanReport,
    drives: &'a [DiskStatus],
}

pub(crate) fn print_results_table<'a>(results: impl IntoIterator<Item = &'a ScanResult>) {
    println!("  {:<24} {:<50} {:>12}", "LOCATION", "PATH", "SIZE");
    println!("  {}", "─".repeat(88));

    for result in results {
        println!(
            "  {:<24} {:<50} {:>12}",
            result.label,
            truncate_path(&result.path.display().to_string(), 48),
            result.display_size,
        );
    }
}

fn print_report(report: &ScanReport) {
    let summary = &report.summary;

    if report.results.is_empty() {
        println!("No junk found.");
    } else {
        print_results_table(&report.results);
        println!();
        println!(
            "Total: {} in {} location{}",
            format_size(summary.total_size_bytes, BINARY),
            summary.item_count,
            plural(summary.item_count)
        );
    }

    println!(
        "Issues found: {} issue{}",
        summary.issue_count,
        plural(summary.issue_count)
    );

    if summary.skipped_entries > 0 {
        println!(
            "Skipped {} unreadable entr{}",
            summary.skipped_entries,
            if summary.skipped_entries == 1 { "y" } else { "ies" }
        );
    }
}

fn print_drives(drives: &[DiskStatus]) {
    if drives.is_empty() {
        return;
    }

    println!("\nDrives:");
    for drive in drives {
        let marker = if drive.is_nearly_full() { "!" } else { " " };
        println!(
            "  {} {:<32} {:>5.1}% used  {}",
            marker,
            drive.title(),
            drive.percent,
            drive.free_label()
        );
    }
}
