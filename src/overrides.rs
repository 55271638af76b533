//! Build override mappings from dotted pairs and TOML documents.
//!
//! Section names themselves contain dots (`db.main`), so a dotted override key
//! is split at its **last** dot: `"db.main.port"` targets key `port` of
//! section `db.main`.

use toml::{Table, Value};

use crate::error::ConnfigError;
use crate::mapping::ConfigMapping;

/// Convert `("section.key", value)` pairs into a mapping.
///
/// If multiple entries target the same key, the last one wins.
pub fn overrides_to_mapping(entries: &[(String, String)]) -> Result<ConfigMapping, ConnfigError> {
    let mut mapping = ConfigMapping::new();
    for (dotted_key, value) in entries {
        let (section, key) = split_override_key(dotted_key)?;
        mapping.set(section, &key.to_lowercase(), value.clone());
    }
    Ok(mapping)
}

/// Split `"db.main.port"` into `("db.main", "port")`.
pub fn split_override_key(dotted_key: &str) -> Result<(&str, &str), ConnfigError> {
    match dotted_key.rsplit_once('.') {
        Some((section, key)) if !section.is_empty() && !key.is_empty() => Ok((section, key)),
        _ => Err(ConnfigError::InvalidOverride {
            key: dotted_key.to_string(),
            reason: "expected 'section.key'".into(),
        }),
    }
}

/// Convert a TOML document into a mapping.
///
/// Tables become sections; nested tables join their names with `.`, so
/// `[db.main]` and `["db.main"]` name the same section. Scalars are
/// stringified. Top-level scalars and arrays have no section to live in and
/// are rejected.
pub fn toml_to_mapping(content: &str) -> Result<ConfigMapping, ConnfigError> {
    let table: Table = toml::from_str(content)?;
    let mut mapping = ConfigMapping::new();
    for (name, value) in table {
        match value {
            Value::Table(section) => collect_section(&mut mapping, &name, section)?,
            _ => {
                return Err(ConnfigError::InvalidOverride {
                    key: name,
                    reason: "top-level values must be tables".into(),
                });
            }
        }
    }
    Ok(mapping)
}

fn collect_section(
    mapping: &mut ConfigMapping,
    section: &str,
    table: Table,
) -> Result<(), ConnfigError> {
    // A table holding only sub-tables is a path segment, not a section.
    if table.is_empty() || table.values().any(|v| !v.is_table()) {
        mapping.ensure_section(section);
    }
    for (key, value) in table {
        match value {
            Value::Table(nested) => collect_section(mapping, &format!("{section}.{key}"), nested)?,
            Value::Array(_) => {
                return Err(ConnfigError::InvalidOverride {
                    key: format!("{section}.{key}"),
                    reason: "arrays are not supported".into(),
                });
            }
            scalar => mapping.set(section, &key.to_lowercase(), scalar_to_string(scalar)),
        }
    }
    Ok(())
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
