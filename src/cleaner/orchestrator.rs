//! Orchestrator for a cleaning pass over a selection.

use crate::cleaner::executor::{CleanExecutor, CleanOutcome, Remover};
use crate::scanner::{NoProgress, ProgressSink, ScanResult};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Summary of cleaning results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    /// Targets that existed and were worked on.
    pub attempted: usize,
    /// Targets emptied completely.
    pub succeeded: usize,
    /// Targets that disappeared before cleaning.
    pub missing: usize,
    /// Entries removed across all targets.
    pub removed_entries: u64,
    /// Entries left behind across all targets.
    pub failed_entries: u64,
}

impl fmt::Display for CleanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failed_entries == 0 {
            write!(f, "Done")
        } else {
            write!(
                f,
                "Done, with {} item{} not removed",
                self.failed_entries,
                if self.failed_entries == 1 { "" } else { "s" }
            )
        }
    }
}

/// Outcomes of one cleaning pass with their summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub outcomes: Vec<CleanOutcome>,
    pub summary: CleanSummary,
}

/// Cleans the selected entries of a selection, one target at a time.
#[derive(Clone, Default)]
pub struct Cleaner {
    executor: CleanExecutor,
}

impl Cleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cleaner deleting through a custom remover.
    pub fn with_remover(remover: Arc<dyn Remover>) -> Self {
        Self {
            executor: CleanExecutor::new(remover),
        }
    }

    /// Clean every selected entry, in the given order.
    ///
    /// Unselected entries are not touched and produce no outcome.
    pub fn clean(&self, entries: &[(ScanResult, bool)]) -> Vec<CleanOutcome> {
        self.clean_with_progress(entries, &mut NoProgress)
    }

    /// Like [`Cleaner::clean`], reporting progress after each target.
    pub fn clean_with_progress(
        &self,
        entries: &[(ScanResult, bool)],
        sink: &mut dyn ProgressSink,
    ) -> Vec<CleanOutcome> {
        let selected: Vec<&ScanResult> = entries
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(result, _)| result)
            .collect();

        let total = selected.len();
        let mut outcomes = Vec::with_capacity(total);

        for (idx, target) in selected.into_iter().enumerate() {
            tracing::info!(label = %target.label, path = %target.path.display(), "Cleaning");
            outcomes.push(self.executor.clean(target));
            sink.report((idx + 1) as f64 / total as f64, &format!("Cleaned {}", target.label));
        }

        outcomes
    }

    /// Clean and summarize in one go.
    pub fn run(&self, entries: &[(ScanResult, bool)], sink: &mut dyn ProgressSink) -> CleanReport {
        let outcomes = self.clean_with_progress(entries, sink);
        let summary = Self::summarize(&outcomes);
        tracing::info!(
            attempted = summary.attempted,
            failed_entries = summary.failed_entries,
            "Clean finished"
        );
        CleanReport { outcomes, summary }
    }

    /// Get summary statistics from outcomes.
    pub fn summarize(outcomes: &[CleanOutcome]) -> CleanSummary {
        let mut summary = CleanSummary::default();

        for outcome in outcomes {
            if outcome.attempted {
                summary.attempted += 1;
            } else {
                summary.missing += 1;
            }
            if outcome.succeeded {
                summary.succeeded += 1;
            }
            summary.removed_entries += outcome.removed_entries;
            summary.failed_entries += outcome.failed_entries;
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::SelectionSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_targets(count: usize) -> (TempDir, Vec<ScanResult>) {
        let tmp = TempDir::new().unwrap();
        let mut results = Vec::new();

        for i in 0..count {
            let dir = tmp.path().join(format!("cache-{}", i));
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join("blob"), "x".repeat(100)).unwrap();
            results.push(ScanResult::new(format!("Cache {}", i), dir, 100));
        }

        (tmp, results)
    }

    #[test]
    fn test_clean_only_selected() {
        let (_tmp, results) = create_targets(3);
        let mut selection = SelectionSet::new(results.clone());
        selection.toggle(1);

        let outcomes = Cleaner::new().clean(selection.entries());

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].label, "Cache 0");
        assert_eq!(outcomes[1].label, "Cache 2");
        assert!(!results[0].path.join("blob").exists());
        assert!(results[1].path.join("blob").exists());
        assert!(!results[2].path.join("blob").exists());
    }

    #[test]
    fn test_nothing_selected_touches_nothing() {
        let (_tmp, results) = create_targets(2);
        let mut selection = SelectionSet::new(results.clone());
        selection.deselect_all();

        let mut calls = 0;
        let outcomes = Cleaner::new()
            .clean_with_progress(selection.entries(), &mut |_: f64, _: &str| calls += 1);

        assert!(outcomes.is_empty());
        assert_eq!(calls, 0);
        for result in &results {
            assert!(result.path.join("blob").exists());
        }
    }

    #[test]
    fn test_progress_ends_at_one() {
        let (_tmp, results) = create_targets(4);
        let selection = SelectionSet::new(results);

        let mut seen = Vec::new();
        Cleaner::new().clean_with_progress(selection.entries(), &mut |f: f64, _: &str| seen.push(f));

        assert_eq!(seen, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_run_summarizes() {
        let (tmp, mut results) = create_targets(2);
        results.push(ScanResult::new("Gone", tmp.path().join("gone"), 5));
        let selection = SelectionSet::new(results);

        let report = Cleaner::new().run(selection.entries(), &mut NoProgress);

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.summary.attempted, 2);
        assert_eq!(report.summary.succeeded, 2);
        assert_eq!(report.summary.missing, 1);
        assert_eq!(report.summary.removed_entries, 2);
        assert_eq!(report.summary.to_string(), "Done");
    }

    #[test]
    fn test_summarize_counts_failures() {
        let outcome = |label: &str, attempted, succeeded, failed| CleanOutcome {
            label: label.to_string(),
            path: PathBuf::from("/x"),
            attempted,
            succeeded,
            removed_entries: 1,
            failed_entries: failed,
        };

        let summary = Cleaner::summarize(&[
            outcome("a", true, true, 0),
            outcome("b", true, false, 2),
            outcome("c", true, false, 1),
            outcome("d", false, false, 0),
        ]);

        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.failed_entries, 3);
        assert_eq!(summary.to_string(), "Done, with 3 items not removed");
    }

    #[test]
    fn test_single_failure_message() {
        let summary = CleanSummary {
            failed_entries: 1,
            ..Default::default()
        };
        assert_eq!(summary.to_string(), "Done, with 1 item not removed");
    }
}
