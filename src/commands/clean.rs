//! Clean command implementation.

use anyhow::{bail, Result};
use humansize::{format_size, BINARY};
use std::io::{self, Write};

use crate::cleaner::{CleanReport, Cleaner, SelectionSet};
use crate::cli::CleanArgs;
use crate::config::Config;
use crate::task::{wait_for, TaskEvent, Worker};

use super::scan::print_results_table;
use super::{build_scanner, plural, progress_bar, scan_in_background};

/// Run the clean command.
pub fn run(args: CleanArgs, config: &Config, quiet: bool) -> Result<()> {
    let worker = Worker::new();
    let scanner = build_scanner(config, &args.targets);

    println!("Scanning {} location{}...", scanner.catalog().len(), plural(scanner.catalog().len()));
    let report = scan_in_background(&worker, scanner, quiet)?;

    let mut selection = SelectionSet::new(report.results);
    for label in &args.exclude {
        if selection.deselect_label(label) == 0 {
            tracing::warn!(label = %label, "Excluded location was not found by the scan");
        }
    }

    if selection.selected_count() == 0 {
        println!("Nothing to clean.");
        return Ok(());
    }

    println!();
    print_results_table(selection.selected());
    println!(
        "\nSelected: {} in {} location{}",
        format_size(selection.selected_size(), BINARY),
        selection.selected_count(),
        plural(selection.selected_count())
    );

    // Confirmation
    if !args.force {
        print!("\nProceed with cleanup? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("\nCleaning...");
    let bar = progress_bar(quiet)?;
    let rx = worker.start_clean(Cleaner::new(), selection)?;

    let finished = wait_for(rx, |fraction, status| {
        bar.set_position((fraction * 100.0).round() as u64);
        bar.set_message(status.to_string());
    });
    bar.finish_and_clear();

    let report = match finished {
        Some(TaskEvent::CleanFinished(report)) => report,
        _ => bail!("Clean ended without a result"),
    };

    print_clean_report(&report);

    if report.summary.failed_entries > 0 {
        std::process::exit(5); // Partial failure
    }

    Ok(())
}

fn print_clean_report(report: &CleanReport) {
    println!("\nResults:");
    for outcome in &report.outcomes {
        let status = if !outcome.attempted {
            "missing".to_string()
        } else if outcome.succeeded {
            format!("removed {}", outcome.removed_entries)
        } else {
            format!(
                "removed {}, {} not removed",
                outcome.removed_entries, outcome.failed_entries
            )
        };
        println!("  {:<24} {}", outcome.label, status);
    }

    let summary = &report.summary;
    println!(
        "\n  Cleaned: {} of {} location{}",
        summary.succeeded,
        report.outcomes.len(),
        plural(report.outcomes.len())
    );
    if summary.missing > 0 {
        println!("  Missing: {}", summary.missing);
    }
    println!("{}", summary);
}
