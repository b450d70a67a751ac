//! Sequential scan over the target catalog.

use std::sync::Arc;

use super::catalog::{EnvLookup, ProcessEnv, TargetCatalog};
use super::entry::{ScanReport, ScanResult, ScanSummary};
use super::issues::{default_checks, probe_issues, system_reader, IssueCheck, SettingsReader};
use super::size::measure;

/// Receives progress while a scan or clean runs.
pub trait ProgressSink {
    /// `fraction` is in `[0, 1]` and never decreases within one run.
    fn report(&mut self, fraction: f64, status: &str);
}

impl<F: FnMut(f64, &str)> ProgressSink for F {
    fn report(&mut self, fraction: f64, status: &str) {
        self(fraction, status)
    }
}

/// Sink that discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _fraction: f64, _status: &str) {}
}

/// Probes every catalog target and the configuration checks.
#[derive(Clone)]
pub struct Scanner {
    catalog: TargetCatalog,
    checks: Vec<IssueCheck>,
    env: Arc<dyn EnvLookup>,
    settings: Arc<dyn SettingsReader>,
}

impl Scanner {
    /// Scanner over `catalog` using the process environment, the host
    /// settings store and the built-in checks.
    pub fn new(catalog: TargetCatalog) -> Self {
        Self {
            catalog,
            checks: default_checks(),
            env: Arc::new(ProcessEnv),
            settings: system_reader(),
        }
    }

    pub fn with_checks(mut self, checks: Vec<IssueCheck>) -> Self {
        self.checks = checks;
        self
    }

    pub fn with_env(mut self, env: Arc<dyn EnvLookup>) -> Self {
        self.env = env;
        self
    }

    pub fn with_settings(mut self, settings: Arc<dyn SettingsReader>) -> Self {
        self.settings = settings;
        self
    }

    pub fn catalog(&self) -> &TargetCatalog {
        &self.catalog
    }

    /// Run one scan pass.
    ///
    /// Targets are processed one after another in catalog order. After each
    /// target the progress advances by `1 / (N + 1)`; the final step covers
    /// the configuration checks and always ends at exactly `1.0`.
    pub fn scan(&self, sink: &mut dyn ProgressSink) -> ScanReport {
        let steps = self.catalog.len() + 1;
        let mut results = Vec::new();
        let mut skipped_entries = 0u64;

        for (idx, target) in self.catalog.iter().enumerate() {
            match target.resolve(self.env.as_ref()) {
                Some(path) if path.exists() => {
                    let report = measure(&path);
                    skipped_entries += report.skipped;

                    if report.skipped > 0 {
                        tracing::warn!(
                            label = %target.label,
                            skipped = report.skipped,
                            "Some entries could not be read"
                        );
                    }

                    if report.bytes > 0 {
                        tracing::debug!(label = %target.label, bytes = report.bytes, "Found junk");
                        results.push(ScanResult::new(target.label.clone(), path, report.bytes));
                    } else {
                        tracing::debug!(label = %target.label, "Target is empty");
                    }
                }
                Some(path) => {
                    tracing::debug!(label = %target.label, path = %path.display(), "Target not present");
                }
                None => {
                    tracing::debug!(label = %target.label, "Target path could not be resolved");
                }
            }

            let fraction = (idx + 1) as f64 / steps as f64;
            sink.report(fraction, &format!("Scanned {}", target.label));
        }

        let issue_count = probe_issues(&self.checks, self.settings.as_ref());
        sink.report(1.0, "Scan complete");

        let summary = ScanSummary {
            total_size_bytes: results.iter().map(|r| r.size_bytes).sum(),
            item_count: results.len(),
            issue_count,
            skipped_entries,
        };

        tracing::info!(
            items = summary.item_count,
            bytes = summary.total_size_bytes,
            issues = summary.issue_count,
            "Scan finished"
        );

        ScanReport { summary, results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::catalog::JunkTarget;
    use crate::scanner::issues::NoRegistry;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn scanner_for(targets: Vec<JunkTarget>) -> Scanner {
        Scanner::new(TargetCatalog::new(targets))
            .with_checks(vec![])
            .with_env(Arc::new(HashMap::<String, String>::new()))
            .with_settings(Arc::new(NoRegistry))
    }

    fn target(label: &str, path: &Path) -> JunkTarget {
        JunkTarget::new(label, path.to_string_lossy().to_string())
    }

    #[test]
    fn test_scan_reports_existing_target() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        fs::create_dir(&a).unwrap();
        fs::write(a.join("blob"), vec![0u8; 1_048_576]).unwrap();

        let report = scanner_for(vec![target("A", &a)]).scan(&mut NoProgress);

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].label, "A");
        assert_eq!(report.results[0].size_bytes, 1_048_576);
        assert_eq!(report.results[0].display_size, "1.0 MB");
        assert_eq!(report.summary.item_count, 1);
        assert_eq!(report.summary.total_size_bytes, 1_048_576);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_measures_symlinked_target() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("blob"), vec![0u8; 1_048_576]).unwrap();
        let link = tmp.path().join("cache_link");
        symlink(&real, &link).unwrap();

        let report = scanner_for(vec![target("L", &link)]).scan(&mut NoProgress);

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].path, link);
        assert_eq!(report.results[0].size_bytes, 1_048_576);
    }

    #[test]
    fn test_scan_skips_missing_target() {
        let tmp = TempDir::new().unwrap();

        let report = scanner_for(vec![target("B", &tmp.path().join("b"))]).scan(&mut NoProgress);

        assert!(report.results.is_empty());
        assert_eq!(report.summary.item_count, 0);
        assert_eq!(report.summary.total_size_bytes, 0);
    }

    #[test]
    fn test_scan_skips_empty_target() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty");
        fs::create_dir_all(empty.join("nested")).unwrap();
        fs::write(empty.join("nested/zero"), b"").unwrap();

        let report = scanner_for(vec![target("Empty", &empty)]).scan(&mut NoProgress);

        assert!(report.results.is_empty());
    }

    #[test]
    fn test_scan_accepts_file_target() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("dump.dmp");
        fs::write(&file, vec![1u8; 300]).unwrap();

        let report = scanner_for(vec![target("Dump", &file)]).scan(&mut NoProgress);

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].size_bytes, 300);
    }

    #[test]
    fn test_scan_preserves_catalog_order() {
        let tmp = TempDir::new().unwrap();
        for (name, len) in [("small", 10usize), ("large", 5000), ("medium", 500)] {
            let dir = tmp.path().join(name);
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join("f"), vec![0u8; len]).unwrap();
        }

        let report = scanner_for(vec![
            target("small", &tmp.path().join("small")),
            target("missing", &tmp.path().join("missing")),
            target("large", &tmp.path().join("large")),
            target("medium", &tmp.path().join("medium")),
        ])
        .scan(&mut NoProgress);

        let labels: Vec<&str> = report.results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["small", "large", "medium"]);
        assert_eq!(report.summary.total_size_bytes, 5510);
    }

    #[test]
    fn test_progress_is_monotonic_and_ends_at_one() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("x")).unwrap();
        fs::write(tmp.path().join("x/f"), b"data").unwrap();

        let scanner = scanner_for(vec![
            target("x", &tmp.path().join("x")),
            target("y", &tmp.path().join("y")),
            target("z", &tmp.path().join("z")),
        ]);

        let mut seen: Vec<(f64, String)> = Vec::new();
        scanner.scan(&mut |fraction: f64, status: &str| seen.push((fraction, status.to_string())));

        assert_eq!(seen.len(), 4);
        assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
        assert!((seen[0].0 - 0.25).abs() < 1e-9);
        assert_eq!(seen[0].1, "Scanned x");
        assert_eq!(seen.last().unwrap().0, 1.0);
        assert_eq!(seen.last().unwrap().1, "Scan complete");
    }

    #[test]
    fn test_empty_catalog_still_completes() {
        let mut seen = Vec::new();
        let report = scanner_for(vec![]).scan(&mut |fraction: f64, _: &str| seen.push(fraction));

        assert_eq!(seen, vec![1.0]);
        assert_eq!(report.summary.item_count, 0);
    }

    #[test]
    fn test_unresolvable_target_is_absent() {
        let report = scanner_for(vec![JunkTarget::new("Cache", "%NOT_SET_ANYWHERE%/cache")])
            .scan(&mut NoProgress);

        assert!(report.results.is_empty());
    }

    #[test]
    fn test_paths_resolve_at_scan_time() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        fs::create_dir(&cache).unwrap();
        fs::write(cache.join("entry"), vec![0u8; 42]).unwrap();

        let mut env = HashMap::new();
        env.insert("CACHE_ROOT".to_string(), tmp.path().to_string_lossy().to_string());

        let report = scanner_for(vec![JunkTarget::new("Cache", "%CACHE_ROOT%/cache")])
            .with_env(Arc::new(env))
            .scan(&mut NoProgress);

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].path, cache);
    }

    #[test]
    fn test_issue_count_passes_through() {
        let report = scanner_for(vec![])
            .with_checks(default_checks())
            .scan(&mut NoProgress);

        // Only the telemetry check counts a missing value as an issue
        assert_eq!(report.summary.issue_count, 1);
    }
}
