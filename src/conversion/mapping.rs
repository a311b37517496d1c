use std::collections::{BTreeMap, BTreeSet};

use super::{IncompleteMappingError, MappingError};

/// Labels in `inconsistent` without a non-blank replacement in `mapping`.
pub fn missing_labels(mapping: &BTreeMap<String, String>, inconsistent: &BTreeSet<String>) -> BTreeSet<String> {
    inconsistent
        .iter()
        .filter(|label| mapping.get(*label).map_or(true, |new| new.trim().is_empty()))
        .cloned()
        .collect()
}

pub fn check_completeness(
    mapping: &BTreeMap<String, String>,
    inconsistent: &BTreeSet<String>,
) -> Result<(), IncompleteMappingError> {
    let missing = missing_labels(mapping, inconsistent);
    if !missing.is_empty() {
        return Err(IncompleteMappingError { missing });
    }

    Ok(())
}

/// An operator's mapping while it is being assembled. Keys are limited to the
/// inconsistent labels and are never removed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappingDraft {
    expected: BTreeSet<String>,
    entries: BTreeMap<String, String>,
}

impl MappingDraft {
    pub fn new(expected: BTreeSet<String>) -> MappingDraft {
        MappingDraft {
            expected,
            entries: BTreeMap::new(),
        }
    }

    pub fn expects(&self, label: &str) -> bool {
        self.expected.contains(label)
    }

    /// Sets (or replaces) the target of an inconsistent label.
    pub fn assign(&mut self, old: &str, new: impl Into<String>) -> Result<(), MappingError> {
        if !self.expects(old) {
            return Err(MappingError::UnknownLabel(old.to_string()));
        }

        self.entries.insert(old.to_string(), new.into());

        Ok(())
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries.get(old).map(String::as_str)
    }

    pub fn pending(&self) -> BTreeSet<String> {
        missing_labels(&self.entries, &self.expected)
    }

    /// Produces the immutable mapping once every expected label has a
    /// non-blank replacement.
    pub fn freeze(self) -> Result<CategoryMapping, IncompleteMappingError> {
        check_completeness(&self.entries, &self.expected)?;

        Ok(CategoryMapping { entries: self.entries })
    }
}

/// A complete old label → new label mapping, consumed by the transformer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryMapping {
    entries: BTreeMap<String, String>,
}

impl CategoryMapping {
    pub fn get(&self, old: &str) -> Option<&str> {
        self.entries.get(old).map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(old, new)| (old.as_str(), new.as_str()))
    }
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod tests;
