//! Selective deletion of scan results.
//!
//! This module provides:
//! - The user selection over scan results
//! - Best-effort removal of directory contents and single files
//! - Aggregation of per-target outcomes

mod executor;
mod orchestrator;
mod selection;

pub use executor::{CleanExecutor, CleanOutcome, FsRemover, Remover};
pub use orchestrator::{CleanReport, CleanSummary, Cleaner};
pub use selection::SelectionSet;
