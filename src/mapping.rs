//! The merged section → key → value view of every configuration source.
//!
//! All values are strings. Numeric or boolean literals in a source file stay
//! text here; each consumer coerces what it reads (see the port check in
//! [`validate`](crate::validate)).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Section whose keys every other section inherits unless it sets them itself.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Fields of one section, keyed by lower-cased field name.
pub type Section = BTreeMap<String, String>;

/// Section name → fields. Built by the merge engine, read by validators.
///
/// Backed by a `BTreeMap` so iteration order (and therefore every listing or
/// report built from it) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigMapping {
    sections: BTreeMap<String, Section>,
}

impl ConfigMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Look up a single field. `None` if either the section or the key is absent.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|fields| fields.get(key))
            .map(String::as_str)
    }

    /// Section names in sorted order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Set `section.key = value`, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Make sure `section` exists, even if it ends up with no fields.
    pub fn ensure_section(&mut self, section: &str) -> &mut Section {
        self.sections.entry(section.to_string()).or_default()
    }

    /// Flatten into `("section.key", value)` pairs, sorted by section then key.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.sections
            .iter()
            .flat_map(|(name, fields)| {
                fields
                    .iter()
                    .map(move |(key, value)| (format!("{name}.{key}"), value.clone()))
            })
            .collect()
    }

    pub(crate) fn into_sections(self) -> BTreeMap<String, Section> {
        self.sections
    }
}

impl From<BTreeMap<String, Section>> for ConfigMapping {
    fn from(sections: BTreeMap<String, Section>) -> Self {
        Self { sections }
    }
}
