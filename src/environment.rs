//! Work out which deployment environment (`dev`, `stage`, `prod`, ...) the
//! configuration describes.
//!
//! Searches a fixed list of sections for a fixed list of field names and
//! returns the first non-empty value. The caller may pin the section, the
//! field, or the fallback.

use tracing::debug;

use crate::mapping::ConfigMapping;

pub const SEARCH_SECTIONS: &[&str] = &["server", "basic", "default", "system", "main", "config"];
pub const FIELD_NAMES: &[&str] = &["environment", "env"];
pub const DEFAULT_ENVIRONMENT: &str = "dev";

#[derive(Debug, Clone)]
pub struct Environment<'a> {
    mapping: &'a ConfigMapping,
    section: Option<String>,
    field: Option<String>,
    default_value: String,
}

impl<'a> Environment<'a> {
    pub fn new(mapping: &'a ConfigMapping) -> Self {
        Self {
            mapping,
            section: None,
            field: None,
            default_value: DEFAULT_ENVIRONMENT.to_string(),
        }
    }

    /// Only look in this section.
    pub fn section(mut self, name: &str) -> Self {
        self.section = Some(name.to_string());
        self
    }

    /// Only look for this field.
    pub fn field(mut self, name: &str) -> Self {
        self.field = Some(name.to_string());
        self
    }

    /// Value returned when nothing is found (default: `"dev"`).
    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = value.to_string();
        self
    }

    pub fn resolve(&self) -> String {
        let sections: Vec<&str> = match &self.section {
            Some(name) => vec![name.as_str()],
            None => SEARCH_SECTIONS.to_vec(),
        };
        let fields: Vec<&str> = match &self.field {
            Some(name) => vec![name.as_str()],
            None => FIELD_NAMES.to_vec(),
        };

        for section in &sections {
            for field in &fields {
                if let Some(value) = self.mapping.get(section, field)
                    && !value.trim().is_empty()
                {
                    return value.trim().to_string();
                }
            }
        }

        debug!(
            default = %self.default_value,
            "no environment configured, using default"
        );
        self.default_value.clone()
    }
}
