//! Decide whether a section describes a database connection, and whether that
//! description is complete.
//!
//! Classification runs in two stages:
//!
//! 1. **Is it a connection section?** The section must exist, its name must
//!    start with the prefix (`db` by default), it must not be ignored, and its
//!    `dialect` must be recognized. An ignored section is `false` no matter
//!    what else it holds. A `db*` section with no `dialect`, or an unknown
//!    one, is a configuration error rather than "not a connection".
//! 2. **Is it valid?** File-based dialects (`sqlite`, `access`) only need an
//!    existing `path`. Network dialects need `host`, `port`, `username`,
//!    `password`, and `database`; every one of them is checked even after one
//!    fails. When all pass, `schema` is required too, unless schema checks are
//!    turned off or the dialect has no schemas (`mysql`).
//!
//! Field errors propagate unchanged. Only a failed check, a non-matching name,
//! or an ignored section produce a plain `false`.

use crate::error::ConnfigError;
use crate::mapping::ConfigMapping;
use crate::types::Dialect;
use crate::validate::{FieldValidator, SectionExists, ShouldIgnore, Validate};

/// Default section-name prefix for connection sections.
pub const DEFAULT_PREFIX: &str = "db";

/// The result of classifying one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not a connection section (wrong prefix, ignored, or absent under the
    /// lenient policy).
    NotConnection,
    /// A connection section that fails validation.
    Invalid(Dialect),
    /// A complete connection section.
    Valid(Dialect),
}

impl Classification {
    pub fn is_valid(self) -> bool {
        matches!(self, Classification::Valid(_))
    }
}

/// Builder for [`ConnectionClassifier`].
pub struct ClassifierBuilder<'a> {
    mapping: &'a ConfigMapping,
    prefix: String,
    raise_errors: bool,
    also_validate_schema: bool,
}

impl<'a> ClassifierBuilder<'a> {
    /// Section-name prefix that marks a connection section (default: `"db"`).
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Raise missing or malformed fields as errors (default: `true`).
    pub fn raise_errors(mut self, raise: bool) -> Self {
        self.raise_errors = raise;
        self
    }

    /// Require `schema` for dialects that have schemas (default: `true`).
    pub fn also_validate_schema(mut self, validate: bool) -> Self {
        self.also_validate_schema = validate;
        self
    }

    pub fn build(self) -> ConnectionClassifier<'a> {
        let mapping = self.mapping;
        let raise = self.raise_errors;
        ConnectionClassifier {
            mapping,
            prefix: self.prefix,
            also_validate_schema: self.also_validate_schema,
            section_exists: SectionExists::new(mapping, raise),
            should_ignore: ShouldIgnore::new(mapping),
            is_valid_dialect: FieldValidator::dialect(mapping, raise),
            is_valid_path: FieldValidator::path(mapping, raise),
            network_chain: [
                FieldValidator::host(mapping, raise),
                FieldValidator::port(mapping, raise),
                FieldValidator::username(mapping, raise),
                FieldValidator::password(mapping, raise),
                FieldValidator::database(mapping, raise),
            ],
            is_valid_schema: FieldValidator::schema(mapping, raise),
        }
    }
}

/// Classifies sections of one mapping. Holds only the mapping reference and
/// the validators built from it; no state carries over between calls.
pub struct ConnectionClassifier<'a> {
    mapping: &'a ConfigMapping,
    prefix: String,
    also_validate_schema: bool,
    section_exists: SectionExists<'a>,
    should_ignore: ShouldIgnore<'a>,
    is_valid_dialect: FieldValidator<'a>,
    is_valid_path: FieldValidator<'a>,
    network_chain: [FieldValidator<'a>; 5],
    is_valid_schema: FieldValidator<'a>,
}

impl<'a> ConnectionClassifier<'a> {
    pub fn builder(mapping: &'a ConfigMapping) -> ClassifierBuilder<'a> {
        ClassifierBuilder {
            mapping,
            prefix: DEFAULT_PREFIX.to_string(),
            raise_errors: true,
            also_validate_schema: true,
        }
    }

    /// A classifier with the default policy: prefix `db`, strict errors,
    /// schema checks on.
    pub fn new(mapping: &'a ConfigMapping) -> Self {
        Self::builder(mapping).build()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The mapping this classifier was built over.
    pub fn mapping(&self) -> &'a ConfigMapping {
        self.mapping
    }

    /// Stage 1: does `section` describe a database connection?
    pub fn is_connection_section(&self, section: &str) -> Result<bool, ConnfigError> {
        Ok(self.is_section_exists(section)?
            && section.starts_with(self.prefix.as_str())
            && !self.should_ignore.check(section)
            && self.is_valid_dialect.validate(section)?)
    }

    /// Stages 1 and 2: is `section` a complete connection description?
    pub fn is_valid_connection_section(&self, section: &str) -> Result<bool, ConnfigError> {
        Ok(self.classify(section)?.is_valid())
    }

    /// Full classification of `section`.
    pub fn classify(&self, section: &str) -> Result<Classification, ConnfigError> {
        if !self.is_connection_section(section)? {
            return Ok(Classification::NotConnection);
        }
        let Some(dialect) = self.dialect_of(section) else {
            return Ok(Classification::NotConnection);
        };

        let valid = if dialect.is_file_based() {
            self.is_valid_path.validate(section)?
        } else {
            self.validate_network(section, dialect)?
        };

        Ok(if valid {
            Classification::Valid(dialect)
        } else {
            Classification::Invalid(dialect)
        })
    }

    fn is_section_exists(&self, section: &str) -> Result<bool, ConnfigError> {
        self.section_exists.validate(section)
    }

    fn dialect_of(&self, section: &str) -> Option<Dialect> {
        self.mapping.get(section, "dialect")?.parse().ok()
    }

    fn validate_network(&self, section: &str, dialect: Dialect) -> Result<bool, ConnfigError> {
        let mut out = true;
        for validator in &self.network_chain {
            if !validator.validate(section)? {
                out = false;
            }
        }

        if out && self.also_validate_schema && !dialect.is_schema_less() {
            out = self.is_valid_schema.validate(section)?;
        }
        Ok(out)
    }
}
