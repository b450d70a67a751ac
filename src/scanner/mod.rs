mod catalog;
mod engine;
mod entry;
mod issues;
mod size;

pub use catalog::{
    default_targets, resolve_template, EnvLookup, JunkTarget, ProcessEnv, TargetCatalog,
};
pub use engine::{NoProgress, ProgressSink, Scanner};
pub use entry::{ScanReport, ScanResult, ScanSummary};
pub use issues::{
    default_checks, probe_issues, system_reader, Hive, IssueCheck, MissingPolicy, NoRegistry,
    SettingsReader,
};
#[cfg(windows)]
pub use issues::WindowsRegistry;
pub use size::{compute_size, display_size, measure, SizeReport};
