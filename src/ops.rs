//! Config operations: listing, key lookup, connection checks, and result types.
//!
//! Provides the logic behind `list`, `files`, `get`, `check`, and `env`, and the
//! `ConfigResult` enum that callers use to display results.

use std::fmt;
use std::path::PathBuf;

use crate::classify::{Classification, ConnectionClassifier};
use crate::environment::Environment;
use crate::error::ConnfigError;
use crate::mapping::ConfigMapping;
use crate::types::Dialect;

/// How one section fared in a connection check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionStatus {
    Valid(Dialect),
    Invalid(Dialect),
    NotConnection,
    /// The section raised; the message is the error's display text.
    Error(String),
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionStatus::Valid(d) => write!(f, "valid ({d})"),
            SectionStatus::Invalid(d) => write!(f, "invalid ({d})"),
            SectionStatus::NotConnection => write!(f, "not a connection"),
            SectionStatus::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// Config files found, in merge order.
    Files { paths: Vec<PathBuf> },
    /// All merged `section.key = value` pairs.
    Listing { entries: Vec<(String, String)> },
    /// The merged mapping as pretty-printed JSON.
    Json(String),
    /// A single field's value.
    KeyValue {
        section: String,
        key: String,
        value: String,
    },
    /// Per-section connection check.
    Check { rows: Vec<(String, SectionStatus)> },
    /// The resolved environment name.
    Environment(String),
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Files { paths } => {
                for (i, path) in paths.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", path.display())?;
                }
                Ok(())
            }
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            ConfigResult::Json(json) => write!(f, "{json}"),
            ConfigResult::KeyValue {
                section,
                key,
                value,
            } => write!(f, "{section}.{key} = {value}"),
            ConfigResult::Check { rows } => {
                for (i, (section, status)) in rows.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{section}: {status}")?;
                }
                Ok(())
            }
            ConfigResult::Environment(env) => write!(f, "{env}"),
        }
    }
}

/// List all merged values as flattened `section.key` pairs.
pub fn list_values(mapping: &ConfigMapping) -> ConfigResult {
    ConfigResult::Listing {
        entries: mapping.entries(),
    }
}

/// Serialize the merged mapping as JSON.
pub fn list_json(mapping: &ConfigMapping) -> Result<ConfigResult, ConnfigError> {
    Ok(ConfigResult::Json(serde_json::to_string_pretty(mapping)?))
}

/// Look up one field.
pub fn get_value(
    mapping: &ConfigMapping,
    section: &str,
    key: &str,
) -> Result<ConfigResult, ConnfigError> {
    let fields = mapping
        .section(section)
        .ok_or_else(|| ConnfigError::MissingSection(section.into()))?;
    let value = fields.get(key).ok_or_else(|| ConnfigError::MissingField {
        section: section.into(),
        key: key.into(),
    })?;
    Ok(ConfigResult::KeyValue {
        section: section.into(),
        key: key.into(),
        value: value.clone(),
    })
}

/// Classify every section, reporting errors per section instead of stopping.
pub fn check_sections(
    mapping: &ConfigMapping,
    prefix: Option<&str>,
    validate_schema: bool,
) -> ConfigResult {
    let mut builder = ConnectionClassifier::builder(mapping).also_validate_schema(validate_schema);
    if let Some(prefix) = prefix {
        builder = builder.prefix(prefix);
    }
    let classifier = builder.build();

    let rows = mapping
        .section_names()
        .map(|name| {
            let status = match classifier.classify(name) {
                Ok(Classification::Valid(d)) => SectionStatus::Valid(d),
                Ok(Classification::Invalid(d)) => SectionStatus::Invalid(d),
                Ok(Classification::NotConnection) => SectionStatus::NotConnection,
                Err(e) => SectionStatus::Error(e.to_string()),
            };
            (name.to_string(), status)
        })
        .collect();

    ConfigResult::Check { rows }
}

/// Resolve the environment name with the default search.
pub fn environment(mapping: &ConfigMapping) -> ConfigResult {
    ConfigResult::Environment(Environment::new(mapping).resolve())
}
