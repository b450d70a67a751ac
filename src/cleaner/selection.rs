//! User selection over scan results.

use crate::scanner::ScanResult;

/// Scan results paired with a selected flag. Everything starts selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: Vec<(ScanResult, bool)>,
}

impl SelectionSet {
    pub fn new(results: Vec<ScanResult>) -> Self {
        Self {
            entries: results.into_iter().map(|r| (r, true)).collect(),
        }
    }

    /// Flip the flag at `index`. Returns the new value, `None` if out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let (_, selected) = self.entries.get_mut(index)?;
        *selected = !*selected;
        Some(*selected)
    }

    /// Set the flag at `index`. Returns false if out of range.
    pub fn set(&mut self, index: usize, selected: bool) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.1 = selected;
                true
            }
            None => false,
        }
    }

    pub fn select_all(&mut self) {
        self.entries.iter_mut().for_each(|e| e.1 = true);
    }

    pub fn deselect_all(&mut self) {
        self.entries.iter_mut().for_each(|e| e.1 = false);
    }

    /// Deselect every entry with this label (case-insensitive).
    /// Returns the number of entries affected.
    pub fn deselect_label(&mut self, label: &str) -> usize {
        let mut count = 0;
        for (result, selected) in &mut self.entries {
            if result.label.eq_ignore_ascii_case(label) {
                *selected = false;
                count += 1;
            }
        }
        count
    }

    pub fn is_selected(&self, index: usize) -> Option<bool> {
        self.entries.get(index).map(|e| e.1)
    }

    pub fn selected(&self) -> impl Iterator<Item = &ScanResult> {
        self.entries.iter().filter(|e| e.1).map(|e| &e.0)
    }

    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    /// Total bytes of the selected entries.
    pub fn selected_size(&self) -> u64 {
        self.selected().map(|r| r.size_bytes).sum()
    }

    pub fn entries(&self) -> &[(ScanResult, bool)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ScanResult>> for SelectionSet {
    fn from(results: Vec<ScanResult>) -> Self {
        Self::new(results)
    }
}
