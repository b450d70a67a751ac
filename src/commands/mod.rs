//! Command implementations for the CLI front end.

pub mod clean;
pub mod programs;
pub mod scan;

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::TargetArgs;
use crate::config::Config;
use crate::scanner::{system_reader, ScanReport, Scanner, TargetCatalog};
use crate::task::{wait_for, TaskEvent, Worker};

/// Build the scanner for the configured catalog plus any ad hoc targets.
pub fn build_scanner(config: &Config, args: &TargetArgs) -> Scanner {
    let mut catalog = if args.no_defaults {
        TargetCatalog::default()
    } else {
        config.scanner.catalog()
    };

    for target in &args.targets {
        catalog.push(target.clone());
    }

    Scanner::new(catalog)
        .with_checks(config.scanner.issue_checks.clone())
        .with_settings(system_reader())
}

/// Progress bar used as the sink for background tasks.
pub fn progress_bar(quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let bar = ProgressBar::new(100);
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}",
    )?);
    Ok(bar)
}

/// Run a scan on the worker and wait for its single completion.
pub fn scan_in_background(worker: &Worker, scanner: Scanner, quiet: bool) -> Result<ScanReport> {
    let bar = progress_bar(quiet)?;
    let rx = worker.start_scan(scanner)?;

    let finished = wait_for(rx, |fraction, status| {
        bar.set_position((fraction * 100.0).round() as u64);
        bar.set_message(status.to_string());
    });
    bar.finish_and_clear();

    match finished {
        Some(TaskEvent::ScanFinished(report)) => Ok(report),
        _ => bail!("Scan ended without a result"),
    }
}

/// Shorten long paths for table output.
pub(crate) fn truncate_path(path: &str, width: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= width {
        return path.to_string();
    }
    let tail: String = chars[chars.len() - (width - 3)..].iter().collect();
    format!("...{}", tail)
}

pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
