//! Catalog of junk locations and path template resolution.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A catalog entry: a labelled location suspected to hold reclaimable data.
///
/// `path` is a template. `%NAME%` expands to the environment variable `NAME`,
/// `%NAME|fallback%` uses `fallback` when `NAME` is unset or empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunkTarget {
    pub label: String,
    pub path: String,
}

impl JunkTarget {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }

    /// Resolve the path template against the given environment.
    ///
    /// Returns `None` when a placeholder has neither a value nor a fallback.
    pub fn resolve(&self, env: &dyn EnvLookup) -> Option<PathBuf> {
        resolve_template(&self.path, env).map(PathBuf::from)
    }
}

/// Source of environment variable values.
pub trait EnvLookup: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the environment of the running process at lookup time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

fn is_var_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '(' | ')'))
}

/// Expand `%NAME%` and `%NAME|fallback%` placeholders.
///
/// A `%` that does not open a well-formed placeholder is kept as is.
pub fn resolve_template(template: &str, env: &dyn EnvLookup) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('%') else {
            out.push_str(&rest[start..]);
            return Some(out);
        };

        let inner = &after[..end];
        let (name, fallback) = match inner.split_once('|') {
            Some((name, fallback)) => (name, Some(fallback)),
            None => (inner, None),
        };

        if !is_var_name(name) {
            out.push('%');
            rest = after;
            continue;
        }

        let value = env.var(name).filter(|v| !v.is_empty());
        match (value, fallback) {
            (Some(v), _) => out.push_str(&v),
            (None, Some(f)) if !f.is_empty() => out.push_str(f),
            _ => {
                tracing::debug!(template, variable = name, "Unresolved path placeholder");
                return None;
            }
        }

        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Some(out)
}

/// Ordered, read-only list of junk targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetCatalog {
    targets: Vec<JunkTarget>,
}

impl TargetCatalog {
    pub fn new(targets: Vec<JunkTarget>) -> Self {
        Self { targets }
    }

    /// Well-known Windows temp and cache locations.
    pub fn windows_defaults() -> Self {
        Self::new(default_targets())
    }

    /// Append a target after the existing ones.
    pub fn push(&mut self, target: JunkTarget) {
        self.targets.push(target);
    }

    pub fn targets(&self) -> &[JunkTarget] {
        &self.targets
    }

    pub fn iter(&self) -> impl Iterator<Item = &JunkTarget> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl From<Vec<JunkTarget>> for TargetCatalog {
    fn from(targets: Vec<JunkTarget>) -> Self {
        Self::new(targets)
    }
}

pub fn default_targets() -> Vec<JunkTarget> {
    vec![
        JunkTarget::new("System Temp", r"%TEMP|C:\Windows\Temp%"),
        JunkTarget::new("User Temp", r"%LOCALAPPDATA%\Temp"),
        JunkTarget::new(
            "Windows Update Cache",
            r"C:\Windows\SoftwareDistribution\Download",
        ),
        JunkTarget::new("Prefetch", r"C:\Windows\Prefetch"),
        JunkTarget::new(
            "Chrome Cache",
            r"%LOCALAPPDATA%\Google\Chrome\User Data\Default\Cache",
        ),
        JunkTarget::new(
            "Edge Cache",
            r"%LOCALAPPDATA%\Microsoft\Edge\User Data\Default\Cache",
        ),
    ]
}
