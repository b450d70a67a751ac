//! Fixed drive usage overview.

use serde::Serialize;
use std::path::{Path, PathBuf};
use sysinfo::Disks;

const GIB: f64 = (1024 * 1024 * 1024) as f64;

/// Space usage of one drive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskStatus {
    /// Mount point path (e.g., "C:\", "/")
    pub mount_point: PathBuf,

    /// Device or volume name, when the system reports one
    pub device: Option<String>,

    /// Total capacity in bytes
    pub total: u64,

    /// Used space in bytes
    pub used: u64,

    /// Available space in bytes
    pub available: u64,

    /// Usage percentage (0.0 - 100.0)
    pub percent: f32,
}

impl DiskStatus {
    pub fn new(mount_point: PathBuf, device: Option<String>, total: u64, available: u64) -> Self {
        let available = available.min(total);
        let used = total - available;
        let percent = if total > 0 {
            (used as f64 / total as f64 * 100.0) as f32
        } else {
            0.0
        };

        Self {
            mount_point,
            device,
            total,
            used,
            available,
            percent,
        }
    }

    /// Display name, e.g. `Local Disk (C:\)`.
    pub fn title(&self) -> String {
        format!("Local Disk ({})", self.mount_point.display())
    }

    /// Free space line, e.g. `45.2 GB free of 237.9 GB`.
    pub fn free_label(&self) -> String {
        format!(
            "{:.1} GB free of {:.1} GB",
            self.available as f64 / GIB,
            self.total as f64 / GIB
        )
    }

    /// Drives at or above 90% usage are nearly full.
    pub fn is_nearly_full(&self) -> bool {
        self.percent >= 90.0
    }
}

/// Check if a filesystem is virtual (not a real disk)
fn is_virtual_filesystem(fs_type: &str, mount_point: &Path) -> bool {
    const VIRTUAL_FS: &[&str] = &[
        "proc",
        "sysfs",
        "devtmpfs",
        "devpts",
        "tmpfs",
        "cgroup",
        "cgroup2",
        "debugfs",
        "hugetlbfs",
        "mqueue",
        "configfs",
        "autofs",
        "efivarfs",
        "tracefs",
        "bpf",
        "overlay",
        "squashfs",
        "nsfs",
        "ramfs",
    ];

    if VIRTUAL_FS.contains(&fs_type) {
        return true;
    }

    let mount = mount_point.to_string_lossy();
    mount.starts_with("/snap/") || mount.starts_with("/var/lib/docker/")
}

/// Non-removable, non-virtual drives of this host, in system order.
///
/// Drives reporting no capacity are left out. Never fails: an empty list
/// means nothing could be queried.
pub fn fixed_drives() -> Vec<DiskStatus> {
    let disks = Disks::new_with_refreshed_list();
    let mut drives: Vec<DiskStatus> = Vec::new();

    for disk in disks.list() {
        let fs_type = disk.file_system().to_string_lossy();
        if disk.is_removable() || is_virtual_filesystem(&fs_type, disk.mount_point()) {
            tracing::trace!(mount = %disk.mount_point().display(), fs = %fs_type, "Skipping drive");
            continue;
        }
        if disk.total_space() == 0 {
            continue;
        }
        if drives.iter().any(|d| d.mount_point.as_path() == disk.mount_point()) {
            continue;
        }

        let name = disk.name().to_string_lossy();
        let device = (!name.is_empty()).then(|| name.into_owned());

        drives.push(DiskStatus::new(
            disk.mount_point().to_path_buf(),
            device,
            disk.total_space(),
            disk.available_space(),
        ));
    }

    tracing::debug!(count = drives.len(), "Queried fixed drives");
    drives
}
