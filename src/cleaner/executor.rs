//! Executor for cleaning a single scan result.

use crate::scanner::ScanResult;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Filesystem removal operations used by the executor.
pub trait Remover: Send + Sync {
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    /// Remove a directory tree. A symbolic link is removed, not followed.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// List the direct children of a directory target.
    fn read_dir(&self, path: &Path) -> io::Result<fs::ReadDir> {
        fs::read_dir(path)
    }
}

/// Removes entries through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

/// Result of cleaning one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanOutcome {
    pub label: String,
    pub path: PathBuf,
    /// False when the target was gone before cleaning started
    pub attempted: bool,
    /// True when every entry was removed
    pub succeeded: bool,
    /// Entries removed (direct children for directories)
    pub removed_entries: u64,
    /// Entries that could not be removed
    pub failed_entries: u64,
}

impl CleanOutcome {
    fn missing(target: &ScanResult) -> Self {
        Self {
            label: target.label.clone(),
            path: target.path.clone(),
            attempted: false,
            succeeded: false,
            removed_entries: 0,
            failed_entries: 0,
        }
    }

    fn attempted(target: &ScanResult, removed_entries: u64, failed_entries: u64) -> Self {
        Self {
            label: target.label.clone(),
            path: target.path.clone(),
            attempted: true,
            succeeded: failed_entries == 0,
            removed_entries,
            failed_entries,
        }
    }
}

/// Deletes the contents of a single target.
#[derive(Clone)]
pub struct CleanExecutor {
    remover: Arc<dyn Remover>,
}

impl CleanExecutor {
    /// Create a new executor deleting through the given remover.
    pub fn new(remover: Arc<dyn Remover>) -> Self {
        Self { remover }
    }

    /// Clean a single target.
    ///
    /// A file is removed. A directory keeps its root and loses every direct
    /// child; each child is removed independently and failures are counted,
    /// never propagated.
    pub fn clean(&self, target: &ScanResult) -> CleanOutcome {
        let metadata = match fs::metadata(&target.path) {
            Ok(m) => m,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(label = %target.label, "Target no longer exists");
                return CleanOutcome::missing(target);
            }
            Err(err) => {
                tracing::warn!(path = %target.path.display(), error = %err, "Cannot inspect target");
                return CleanOutcome::attempted(target, 0, 1);
            }
        };

        if metadata.is_dir() {
            let (removed, failed) = self.clean_dir_contents(&target.path);
            CleanOutcome::attempted(target, removed, failed)
        } else {
            match self.remover.remove_file(&target.path) {
                Ok(()) => CleanOutcome::attempted(target, 1, 0),
                Err(err) => {
                    tracing::warn!(path = %target.path.display(), error = %err, "Failed to remove file");
                    CleanOutcome::attempted(target, 0, 1)
                }
            }
        }
    }

    /// Remove every direct child of `dir`. Returns (removed, failed).
    fn clean_dir_contents(&self, dir: &Path) -> (u64, u64) {
        let read_dir = match self.remover.read_dir(dir) {
            Ok(rd) => rd,
            Err(err) => {
                tracing::warn!(path = %dir.display(), error = %err, "Cannot list directory");
                return (0, 1);
            }
        };

        let mut removed = 0u64;
        let mut failed = 0u64;

        for entry in read_dir {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!(path = %dir.display(), error = %err, "Cannot read directory entry");
                    failed += 1;
                    continue;
                }
            };

            let child = entry.path();
            let result = match entry.file_type() {
                Ok(ft) if ft.is_dir() || ft.is_symlink() => self.remover.remove_dir_all(&child),
                Ok(_) => self.remover.remove_file(&child),
                Err(err) => Err(err),
            };

            match result {
                Ok(()) => {
                    tracing::trace!(path = %child.display(), "Removed");
                    removed += 1;
                }
                Err(err) => {
                    tracing::debug!(path = %child.display(), error = %err, "Failed to remove entry");
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            tracing::warn!(path = %dir.display(), failed, "Some entries could not be removed");
        }

        (removed, failed)
    }
}

impl Default for CleanExecutor {
    fn default() -> Self {
        Self::new(Arc::new(FsRemover))
    }
}
