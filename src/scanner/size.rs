use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;

/// Totals gathered while measuring a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeReport {
    /// Sum of regular file lengths
    pub bytes: u64,
    /// Number of regular files counted
    pub files: u64,
    /// Entries that could not be read and contributed nothing
    pub skipped: u64,
}

/// Total byte size of a file or directory tree.
///
/// Never fails: unreadable entries count as zero. See [`measure`].
pub fn compute_size(path: &Path) -> u64 {
    measure(path).bytes
}

/// Measure a file or directory tree, counting the entries that had to be skipped.
///
/// The root is resolved, so a link or junction to a directory is measured as
/// that directory. Symbolic links below the root are never followed and
/// contribute nothing, so a link cycle cannot make the walk revisit a directory.
pub fn measure(path: &Path) -> SizeReport {
    let mut report = SizeReport::default();

    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(err) => {
            if err.kind() != io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %err, "Cannot stat path");
                report.skip();
            }
            return report;
        }
    };

    if metadata.is_file() {
        report.record(Some(metadata.len()));
        return report;
    }

    if !metadata.is_dir() {
        return report;
    }

    let walker = WalkDir::new(path)
        .min_depth(1)
        .follow_root_links(true)
        .follow_links(false);

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(path = ?err.path(), error = %err, "Skipping unreadable entry");
                report.skip();
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let len = match entry.metadata() {
            Ok(m) => Some(m.len()),
            Err(err) => {
                tracing::debug!(path = %entry.path().display(), error = %err, "Skipping unreadable file");
                None
            }
        };
        report.record(len);
    }

    report
}

impl SizeReport {
    /// Add a regular file, or count it as skipped when its length is unknown.
    fn record(&mut self, len: Option<u64>) {
        match len {
            Some(len) => {
                self.bytes += len;
                self.files += 1;
            }
            None => self.skip(),
        }
    }

    fn skip(&mut self) {
        self.skipped += 1;
    }
}

/// Human-readable size as shown next to a scan result.
///
/// Megabytes with one decimal below 1 GiB, gigabytes with two decimals above.
pub fn display_size(bytes: u64) -> String {
    if bytes < GIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.2} GB", bytes as f64 / GIB as f64)
    }
}
