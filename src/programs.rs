//! Installed programs listing with age classification.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

/// Raw uninstall entry as read from the system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramRecord {
    pub display_name: Option<String>,
    /// Expected as `YYYYMMDD`
    pub install_date: Option<String>,
}

impl ProgramRecord {
    pub fn new(display_name: Option<&str>, install_date: Option<&str>) -> Self {
        Self {
            display_name: display_name.map(str::to_string),
            install_date: install_date.map(str::to_string),
        }
    }
}

/// Source of uninstall entries.
pub trait ProgramSource {
    fn records(&self) -> Vec<ProgramRecord>;
}

/// Source for hosts without an uninstall registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrograms;

impl ProgramSource for NoPrograms {
    fn records(&self) -> Vec<ProgramRecord> {
        Vec::new()
    }
}

/// Reads the machine-wide, 32-bit and per-user Uninstall keys.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryPrograms;

#[cfg(windows)]
impl ProgramSource for RegistryPrograms {
    fn records(&self) -> Vec<ProgramRecord> {
        use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};
        use winreg::RegKey;

        let roots = [
            (
                HKEY_LOCAL_MACHINE,
                r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall",
            ),
            (
                HKEY_LOCAL_MACHINE,
                r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall",
            ),
            (
                HKEY_CURRENT_USER,
                r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall",
            ),
        ];

        let mut records = Vec::new();

        for (hive, path) in roots {
            let uninstall = match RegKey::predef(hive).open_subkey(path) {
                Ok(key) => key,
                Err(err) => {
                    tracing::debug!(path, error = %err, "Uninstall key not readable");
                    continue;
                }
            };

            for name in uninstall.enum_keys().flatten() {
                if let Ok(key) = uninstall.open_subkey(&name) {
                    records.push(ProgramRecord {
                        display_name: key.get_value::<String, _>("DisplayName").ok(),
                        install_date: key.get_value::<String, _>("InstallDate").ok(),
                    });
                }
            }
        }

        records
    }
}

/// The program source appropriate for this host.
pub fn system_source() -> Box<dyn ProgramSource> {
    #[cfg(windows)]
    {
        Box::new(RegistryPrograms)
    }
    #[cfg(not(windows))]
    {
        Box::new(NoPrograms)
    }
}

/// An installed program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledProgram {
    pub name: String,
    pub install_date: Option<NaiveDate>,
    /// Days since installation, when the date is known
    pub age_days: Option<i64>,
    /// Installed before the configured cutoff
    pub is_old: bool,
}

impl InstalledProgram {
    /// Install date for display, e.g. `Mar 04, 2021 • 1200 days old`.
    pub fn date_label(&self) -> String {
        match (self.install_date, self.age_days) {
            (Some(date), Some(age)) if self.is_old => {
                format!("{} • {} days old", date.format("%b %d, %Y"), age)
            }
            (Some(date), _) => date.format("%b %d, %Y").to_string(),
            (None, _) => "Unknown".to_string(),
        }
    }
}

/// Parse an `InstallDate` value. Only the 8-digit `YYYYMMDD` form is accepted.
pub fn parse_install_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d").ok()
}

/// Build the program list from raw records.
///
/// Records without a name are dropped and duplicates by name keep the first
/// occurrence. Old programs are listed first; the order is otherwise kept.
/// A cutoff reaching past the supported date range flags nothing as old.
pub fn inventory(
    records: Vec<ProgramRecord>,
    today: NaiveDate,
    old_after_days: u32,
) -> Vec<InstalledProgram> {
    // A cutoff before the earliest representable date means nothing is old
    let cutoff = today.checked_sub_signed(Duration::days(i64::from(old_after_days)));
    let mut seen = HashSet::new();
    let mut programs = Vec::new();

    for record in records {
        let Some(name) = record.display_name.filter(|n| !n.trim().is_empty()) else {
            continue;
        };
        if !seen.insert(name.clone()) {
            continue;
        }

        let install_date = record.install_date.as_deref().and_then(parse_install_date);
        let age_days = install_date.map(|d| (today - d).num_days());
        let is_old = matches!((install_date, cutoff), (Some(d), Some(c)) if d < c);

        programs.push(InstalledProgram {
            name,
            install_date,
            age_days,
            is_old,
        });
    }

    programs.sort_by_key(|p| !p.is_old);
    programs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_install_date() {
        assert_eq!(parse_install_date("20210304"), Some(date(2021, 3, 4)));
        assert_eq!(parse_install_date(" 20210304 "), Some(date(2021, 3, 4)));
        assert_eq!(parse_install_date("2021-03-04"), None);
        assert_eq!(parse_install_date("20211340"), None);
        assert_eq!(parse_install_date("2021034"), None);
        assert_eq!(parse_install_date(""), None);
    }

    #[test]
    fn test_old_programs_first() {
        let today = date(2024, 6, 1);
        let programs = inventory(
            vec![
                ProgramRecord::new(Some("Fresh"), Some("20240501")),
                ProgramRecord::new(Some("Ancient"), Some("20190101")),
                ProgramRecord::new(Some("Undated"), None),
                ProgramRecord::new(Some("Old"), Some("20220101")),
            ],
            today,
            365,
        );

        let names: Vec<&str> = programs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ancient", "Old", "Fresh", "Undated"]);
        assert!(programs[0].is_old);
        assert!(programs[1].is_old);
        assert!(!programs[2].is_old);
        assert!(!programs[3].is_old);
    }

    #[test]
    fn test_cutoff_is_strict() {
        let today = date(2024, 6, 1);
        let exactly = today - Duration::days(365);
        let raw = exactly.format("%Y%m%d").to_string();

        let programs = inventory(vec![ProgramRecord::new(Some("Edge"), Some(raw.as_str()))], today, 365);

        assert!(!programs[0].is_old);
        assert_eq!(programs[0].age_days, Some(365));
    }

    #[test]
    fn test_cutoff_is_configurable() {
        let today = date(2024, 6, 1);
        let records = vec![ProgramRecord::new(Some("Tool"), Some("20240401"))];

        assert!(!inventory(records.clone(), today, 365)[0].is_old);
        assert!(inventory(records, today, 30)[0].is_old);
    }

    #[test]
    fn test_nameless_and_duplicate_records_dropped() {
        let programs = inventory(
            vec![
                ProgramRecord::new(None, Some("20200101")),
                ProgramRecord::new(Some("  "), None),
                ProgramRecord::new(Some("App"), Some("20230101")),
                ProgramRecord::new(Some("App"), Some("20100101")),
            ],
            date(2024, 1, 1),
            365,
        );

        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].install_date, Some(date(2023, 1, 1)));
    }

    #[test]
    fn test_date_label() {
        let today = date(2024, 6, 1);
        let programs = inventory(
            vec![
                ProgramRecord::new(Some("Old"), Some("20230302")),
                ProgramRecord::new(Some("New"), Some("20240304")),
                ProgramRecord::new(Some("Odd"), Some("garbage")),
            ],
            today,
            365,
        );

        assert_eq!(programs[0].date_label(), "Mar 02, 2023 • 457 days old");
        assert_eq!(programs[1].date_label(), "Mar 04, 2024");
        assert_eq!(programs[2].date_label(), "Unknown");
    }

    #[test]
    fn test_no_programs_source() {
        assert!(NoPrograms.records().is_empty());
    }

    #[test]
    fn test_huge_cutoff_flags_nothing() {
        let programs = inventory(
            vec![
                ProgramRecord::new(Some("Ancient"), Some("19990101")),
                ProgramRecord::new(Some("Fresh"), Some("20240501")),
            ],
            date(2024, 6, 1),
            100_000_000,
        );

        assert_eq!(programs.len(), 2);
        assert!(programs.iter().all(|p| !p.is_old));
        assert_eq!(programs[0].name, "Ancient");
        assert_eq!(programs[0].age_days, Some(9283));
    }

    #[test]
    fn test_max_cutoff_does_not_panic() {
        let programs = inventory(
            vec![ProgramRecord::new(Some("Ancient"), Some("19990101"))],
            date(2024, 6, 1),
            u32::MAX,
        );

        assert!(!programs[0].is_old);
    }
}
