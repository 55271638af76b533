use std::path::PathBuf;
use thiserror::Error;

use crate::ini::IniError;

#[derive(Debug, Error)]
pub enum ConnfigError {
    #[error("Section not found: '{0}'")]
    MissingSection(String),

    #[error("Missing required key '{key}' in section '{section}'")]
    MissingField { section: String, key: String },

    #[error("Invalid value for '{key}' in section '{section}': {reason}")]
    InvalidValue {
        section: String,
        key: String,
        reason: String,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseError { path: PathBuf, source: IniError },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode {path} as {encoding}")]
    DecodeError { path: PathBuf, encoding: String },

    #[error("Unknown text encoding '{0}'")]
    UnknownEncoding(String),

    #[error("Invalid override '{key}': {reason}")]
    InvalidOverride { key: String, reason: String },

    #[error("Failed to parse override document: {0}")]
    OverrideParse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Project name is required: call .project_name() on the builder")]
    ProjectNameRequired,
}

impl ConnfigError {
    /// A required section or field is absent.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            ConnfigError::MissingSection(_) | ConnfigError::MissingField { .. }
        )
    }

    /// A field is present but fails its format or range check.
    pub fn is_value(&self) -> bool {
        matches!(self, ConnfigError::InvalidValue { .. })
    }
}
