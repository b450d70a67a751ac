//! Post-scan configuration issue probe.
//!
//! Each check reads a single DWORD setting. Checks are independent and a
//! failed read never aborts the probe.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Registry hive a check reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hive {
    CurrentUser,
    LocalMachine,
}

/// How a check treats a value that is missing or unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingPolicy {
    /// The system default is the desired state
    Healthy,
    /// The system default is the undesired state
    Issue,
}

/// A single configuration check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCheck {
    pub name: String,
    pub hive: Hive,
    pub key: String,
    pub value: String,
    /// Value considered healthy; anything else is an issue
    pub expected: u32,
    pub when_missing: MissingPolicy,
}

impl IssueCheck {
    /// Evaluate this check. Returns true when the setting is an issue.
    ///
    /// A present value is an issue whenever it differs from `expected`, so a
    /// check expecting 0 flags every non-zero value.
    pub fn is_issue(&self, reader: &dyn SettingsReader) -> bool {
        match reader.read_dword(self.hive, &self.key, &self.value) {
            Some(v) => v != self.expected,
            None => self.when_missing == MissingPolicy::Issue,
        }
    }
}

/// Read access to system settings.
pub trait SettingsReader: Send + Sync {
    /// Read a DWORD value, `None` when the key or value is missing or unreadable.
    fn read_dword(&self, hive: Hive, key: &str, value: &str) -> Option<u32>;
}

/// Reader for hosts without a registry. Every value is missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegistry;

impl SettingsReader for NoRegistry {
    fn read_dword(&self, _hive: Hive, _key: &str, _value: &str) -> Option<u32> {
        None
    }
}

/// Reads settings from the Windows registry.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsRegistry;

#[cfg(windows)]
impl SettingsReader for WindowsRegistry {
    fn read_dword(&self, hive: Hive, key: &str, value: &str) -> Option<u32> {
        use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};
        use winreg::RegKey;

        let root = match hive {
            Hive::CurrentUser => RegKey::predef(HKEY_CURRENT_USER),
            Hive::LocalMachine => RegKey::predef(HKEY_LOCAL_MACHINE),
        };

        match root.open_subkey(key).and_then(|k| k.get_value::<u32, _>(value)) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::debug!(key, value, error = %err, "Setting not readable");
                None
            }
        }
    }
}

/// The settings reader appropriate for this host.
pub fn system_reader() -> Arc<dyn SettingsReader> {
    #[cfg(windows)]
    {
        Arc::new(WindowsRegistry)
    }
    #[cfg(not(windows))]
    {
        Arc::new(NoRegistry)
    }
}

/// Run every check and count the issues found.
pub fn probe_issues(checks: &[IssueCheck], reader: &dyn SettingsReader) -> usize {
    checks
        .iter()
        .filter(|check| {
            let issue = check.is_issue(reader);
            if issue {
                tracing::info!(check = %check.name, "Configuration issue detected");
            }
            issue
        })
        .count()
}

pub fn default_checks() -> Vec<IssueCheck> {
    vec![
        // Any non-zero AppsUseLightTheme counts, not only 1
        IssueCheck {
            name: "Light app theme".to_string(),
            hive: Hive::CurrentUser,
            key: r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize".to_string(),
            value: "AppsUseLightTheme".to_string(),
            expected: 0,
            when_missing: MissingPolicy::Healthy,
        },
        IssueCheck {
            name: "Telemetry enabled".to_string(),
            hive: Hive::LocalMachine,
            key: r"SOFTWARE\Policies\Microsoft\Windows\DataCollection".to_string(),
            value: "AllowTelemetry".to_string(),
            expected: 0,
            when_missing: MissingPolicy::Issue,
        },
    ]
}
