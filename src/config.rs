use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::scanner::{default_checks, default_targets, IssueCheck, JunkTarget, TargetCatalog};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub programs: ProgramsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Junk locations to probe, in scan order
    pub targets: Vec<JunkTarget>,
    /// Configuration checks run after the targets
    pub issue_checks: Vec<IssueCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramsConfig {
    /// Programs installed longer ago than this are flagged as old
    pub old_after_days: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            issue_checks: default_checks(),
        }
    }
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            old_after_days: 365,
        }
    }
}

impl ScannerConfig {
    pub fn catalog(&self) -> TargetCatalog {
        TargetCatalog::new(self.targets.clone())
    }
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("turboclean").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// if present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.is_file() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        let config = Self::parse(&content, &path)?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    fn parse(content: &str, path: &Path) -> std::result::Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check values that deserialize fine but make no sense
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for target in &self.scanner.targets {
            if target.label.trim().is_empty() {
                return Err(ConfigError::Invalid("target label must not be empty".into()));
            }
            if target.path.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "target '{}' has an empty path",
                    target.label
                )));
            }
        }

        for check in &self.scanner.issue_checks {
            if check.key.trim().is_empty() || check.value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "issue check '{}' needs a key and a value",
                    check.name
                )));
            }
        }

        if self.programs.old_after_days == 0 {
            return Err(ConfigError::Invalid(
                "programs.old_after_days must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
