//! Single-field section validators.
//!
//! Each validator looks at one field of one section and answers in two steps:
//!
//! 1. [`Validate::inspect`] reports a [`FieldOutcome`] without ever failing.
//! 2. [`Validate::validate`] turns that outcome into `Ok(bool)` or an error,
//!    according to the validator's `raise_errors` policy.
//!
//! Under `raise_errors = true` an absent section or field is a
//! [`MissingSection`](ConnfigError::MissingSection) /
//! [`MissingField`](ConnfigError::MissingField) error, and a present value
//! that fails a format or range check is an
//! [`InvalidValue`](ConnfigError::InvalidValue) error. A present value that
//! is merely unusable (an empty host, a path that doesn't exist) is always
//! `Ok(false)`. Under `raise_errors = false` every non-valid outcome is
//! `Ok(false)`.

use std::path::Path;

use tracing::debug;

use crate::error::ConnfigError;
use crate::mapping::ConfigMapping;
use crate::types::Dialect;

/// What a validator found in one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    Valid,
    /// Present but unusable. Never raised.
    Invalid(String),
    /// Present but fails a format or range check.
    Malformed(String),
    /// The field is absent from the section.
    MissingField,
    /// The section itself is absent.
    MissingSection,
}

/// A check over one section of a [`ConfigMapping`].
pub trait Validate {
    /// The field this validator reads, used in error reports.
    fn key(&self) -> &str;

    /// Whether non-valid outcomes become errors (see the module docs).
    fn raise_errors(&self) -> bool;

    fn inspect(&self, section: &str) -> FieldOutcome;

    fn validate(&self, section: &str) -> Result<bool, ConnfigError> {
        settle(self.inspect(section), section, self.key(), self.raise_errors())
    }
}

/// Apply the error policy to an outcome.
pub fn settle(
    outcome: FieldOutcome,
    section: &str,
    key: &str,
    raise_errors: bool,
) -> Result<bool, ConnfigError> {
    match outcome {
        FieldOutcome::Valid => Ok(true),
        FieldOutcome::Invalid(_) => Ok(false),
        _ if !raise_errors => Ok(false),
        FieldOutcome::Malformed(reason) => Err(ConnfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            reason,
        }),
        FieldOutcome::MissingField => Err(ConnfigError::MissingField {
            section: section.to_string(),
            key: key.to_string(),
        }),
        FieldOutcome::MissingSection => Err(ConnfigError::MissingSection(section.to_string())),
    }
}

/// The section must exist in the mapping.
#[derive(Debug, Clone, Copy)]
pub struct SectionExists<'a> {
    mapping: &'a ConfigMapping,
    raise_errors: bool,
}

impl<'a> SectionExists<'a> {
    pub fn new(mapping: &'a ConfigMapping, raise_errors: bool) -> Self {
        Self {
            mapping,
            raise_errors,
        }
    }
}

impl Validate for SectionExists<'_> {
    fn key(&self) -> &str {
        ""
    }

    fn raise_errors(&self) -> bool {
        self.raise_errors
    }

    fn inspect(&self, section: &str) -> FieldOutcome {
        if self.mapping.contains_section(section) {
            FieldOutcome::Valid
        } else {
            FieldOutcome::MissingSection
        }
    }
}

/// Sections can opt out of processing with `ignore = true` or `ignore = yes`.
#[derive(Debug, Clone)]
pub struct ShouldIgnore<'a> {
    mapping: &'a ConfigMapping,
    key: String,
}

impl<'a> ShouldIgnore<'a> {
    pub const KEY: &'static str = "ignore";
    pub const TRUE: [&'static str; 2] = ["true", "yes"];

    pub fn new(mapping: &'a ConfigMapping) -> Self {
        Self::with_key(mapping, Self::KEY)
    }

    pub fn with_key(mapping: &'a ConfigMapping, key: &str) -> Self {
        Self {
            mapping,
            key: key.to_string(),
        }
    }

    /// `true` if the section asks to be skipped. Never fails: a missing
    /// section, a missing key, or any other value means "don't ignore".
    pub fn check(&self, section: &str) -> bool {
        let Some(value) = self.mapping.get(section, &self.key) else {
            return false;
        };
        let ignored = Self::TRUE
            .iter()
            .any(|t| t.eq_ignore_ascii_case(value.trim()));
        if ignored {
            debug!(section, "config section has been ignored");
        }
        ignored
    }
}

/// The fields a connection section can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Dialect,
    Host,
    Port,
    Username,
    Password,
    Database,
    Schema,
    Path,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Field::Dialect => "dialect",
            Field::Host => "host",
            Field::Port => "port",
            Field::Username => "username",
            Field::Password => "password",
            Field::Database => "database",
            Field::Schema => "schema",
            Field::Path => "path",
        }
    }

    /// Judge a present value.
    pub fn check(self, value: &str) -> FieldOutcome {
        match self {
            Field::Dialect => check_dialect(value),
            Field::Port => check_port(value),
            Field::Password => FieldOutcome::Valid,
            Field::Path => check_path(value),
            Field::Host | Field::Username | Field::Database | Field::Schema => {
                check_non_empty(value)
            }
        }
    }
}

fn check_non_empty(value: &str) -> FieldOutcome {
    if value.trim().is_empty() {
        FieldOutcome::Invalid("must not be empty".into())
    } else {
        FieldOutcome::Valid
    }
}

fn check_dialect(value: &str) -> FieldOutcome {
    if value.trim().is_empty() {
        return FieldOutcome::Invalid("must not be empty".into());
    }
    match value.parse::<Dialect>() {
        Ok(_) => FieldOutcome::Valid,
        Err(reason) => FieldOutcome::Malformed(reason),
    }
}

/// Parse a port number in 1..=65535.
pub fn parse_port(value: &str) -> Result<u16, String> {
    let trimmed = value.trim();
    let n: u64 = trimmed
        .parse()
        .map_err(|_| format!("'{trimmed}' is not a port number"))?;
    match u16::try_from(n) {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(format!("port {n} is out of range 1-65535")),
    }
}

fn check_port(value: &str) -> FieldOutcome {
    match parse_port(value) {
        Ok(_) => FieldOutcome::Valid,
        Err(reason) => FieldOutcome::Malformed(reason),
    }
}

fn check_path(value: &str) -> FieldOutcome {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return FieldOutcome::Invalid("must not be empty".into());
    }
    if Path::new(trimmed).exists() {
        FieldOutcome::Valid
    } else {
        FieldOutcome::Invalid(format!("'{trimmed}' does not exist"))
    }
}

/// Checks one [`Field`] of a section.
#[derive(Debug, Clone, Copy)]
pub struct FieldValidator<'a> {
    mapping: &'a ConfigMapping,
    field: Field,
    raise_errors: bool,
}

impl<'a> FieldValidator<'a> {
    pub fn new(mapping: &'a ConfigMapping, field: Field, raise_errors: bool) -> Self {
        Self {
            mapping,
            field,
            raise_errors,
        }
    }

    /// `dialect` names a recognized engine.
    pub fn dialect(mapping: &'a ConfigMapping, raise_errors: bool) -> Self {
        Self::new(mapping, Field::Dialect, raise_errors)
    }

    /// `host` is non-empty.
    pub fn host(mapping: &'a ConfigMapping, raise_errors: bool) -> Self {
        Self::new(mapping, Field::Host, raise_errors)
    }

    /// `port` is an integer in 1..=65535.
    pub fn port(mapping: &'a ConfigMapping, raise_errors: bool) -> Self {
        Self::new(mapping, Field::Port, raise_errors)
    }

    /// `username` is non-empty.
    pub fn username(mapping: &'a ConfigMapping, raise_errors: bool) -> Self {
        Self::new(mapping, Field::Username, raise_errors)
    }

    /// `password` is present; it may be empty.
    pub fn password(mapping: &'a ConfigMapping, raise_errors: bool) -> Self {
        Self::new(mapping, Field::Password, raise_errors)
    }

    /// `database` is non-empty.
    pub fn database(mapping: &'a ConfigMapping, raise_errors: bool) -> Self {
        Self::new(mapping, Field::Database, raise_errors)
    }

    /// `schema` is non-empty.
    pub fn schema(mapping: &'a ConfigMapping, raise_errors: bool) -> Self {
        Self::new(mapping, Field::Schema, raise_errors)
    }

    /// `path` names something that exists on disk.
    pub fn path(mapping: &'a ConfigMapping, raise_errors: bool) -> Self {
        Self::new(mapping, Field::Path, raise_errors)
    }
}

impl Validate for FieldValidator<'_> {
    fn key(&self) -> &str {
        self.field.key()
    }

    fn raise_errors(&self) -> bool {
        self.raise_errors
    }

    fn inspect(&self, section: &str) -> FieldOutcome {
        let Some(fields) = self.mapping.section(section) else {
            return FieldOutcome::MissingSection;
        };
        match fields.get(self.field.key()) {
            Some(value) => self.field.check(value),
            None => FieldOutcome::MissingField,
        }
    }
}
