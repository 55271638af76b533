//! INI document parsing.
//!
//! Accepts the common INI subset:
//!
//! - `[section]` headers (surrounding whitespace inside the brackets is trimmed);
//!   the name runs to the last `]`, and anything after it is ignored
//! - `key = value` or `key: value`, split at the first delimiter
//! - keys are lower-cased, values are trimmed, empty values are allowed
//! - full-line comments starting with `#` or `;`
//! - indented continuation lines, appended to the previous value with `\n`
//!
//! Within a single document a section or key may only appear once. Repeats
//! across documents are the merge engine's business, not a syntax error.
//!
//! `[DEFAULT]` is parsed like any other section here. Its keys are folded into
//! the other sections only after every source is merged
//! (see [`resolve`](crate::resolve)).

use thiserror::Error;

use crate::mapping::ConfigMapping;

/// A syntax error in one INI document. Line numbers are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IniError {
    #[error("line {line}: key outside of any [section]")]
    MissingSectionHeader { line: usize },

    #[error("line {line}: malformed section header")]
    MalformedHeader { line: usize },

    #[error("line {line}: section '{section}' is already defined")]
    DuplicateSection { line: usize, section: String },

    #[error("line {line}: key '{key}' is already defined in section '{section}'")]
    DuplicateOption {
        line: usize,
        section: String,
        key: String,
    },

    #[error("line {line}: expected 'key = value' or 'key: value'")]
    MissingDelimiter { line: usize },

    #[error("line {line}: empty key")]
    EmptyKey { line: usize },
}

/// The key a continuation line would extend, and the indent of its line.
struct OpenValue {
    key: String,
    indent: usize,
}

/// Parse one INI document into a fresh mapping.
pub fn parse_document(content: &str) -> Result<ConfigMapping, IniError> {
    let mut doc = ConfigMapping::new();
    let mut current: Option<String> = None;
    let mut open: Option<OpenValue> = None;

    for (i, raw) in content.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            open = None;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        let indent = raw.len() - raw.trim_start().len();

        // Continuation of the previous value
        if let (Some(section), Some(value)) = (&current, &open)
            && indent > value.indent
        {
            if let Some(existing) = doc.ensure_section(section).get_mut(&value.key) {
                if !existing.is_empty() {
                    existing.push('\n');
                }
                existing.push_str(trimmed);
            }
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('[') {
            let name = rest
                .rfind(']')
                .map(|end| rest[..end].trim())
                .filter(|name| !name.is_empty())
                .ok_or(IniError::MalformedHeader { line })?;
            if doc.contains_section(name) {
                return Err(IniError::DuplicateSection {
                    line,
                    section: name.to_string(),
                });
            }
            doc.ensure_section(name);
            current = Some(name.to_string());
            open = None;
            continue;
        }

        let Some(section) = &current else {
            return Err(IniError::MissingSectionHeader { line });
        };

        let split = trimmed
            .find(['=', ':'])
            .ok_or(IniError::MissingDelimiter { line })?;
        let key = trimmed[..split].trim().to_lowercase();
        let value = trimmed[split + 1..].trim();
        if key.is_empty() {
            return Err(IniError::EmptyKey { line });
        }

        let fields = doc.ensure_section(section);
        if fields.contains_key(&key) {
            return Err(IniError::DuplicateOption {
                line,
                section: section.clone(),
                key,
            });
        }
        fields.insert(key.clone(), value.to_string());
        open = Some(OpenValue { key, indent });
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_and_keys() {
        let doc = parse_document(
            "[db.main]\ndialect = postgresql\nport: 5432\n\n[server]\nenv = prod\n",
        )
        .unwrap();
        assert_eq!(doc.get("db.main", "dialect"), Some("postgresql"));
        assert_eq!(doc.get("db.main", "port"), Some("5432"));
        assert_eq!(doc.get("server", "env"), Some("prod"));
    }

    #[test]
    fn keys_lowercased_values_trimmed() {
        let doc = parse_document("[s]\n  Host   =   example.com  \n").unwrap();
        assert_eq!(doc.get("s", "host"), Some("example.com"));
    }

    #[test]
    fn header_whitespace_trimmed() {
        let doc = parse_document("[ db.main ]\nhost = h\n").unwrap();
        assert_eq!(doc.get("db.main", "host"), Some("h"));
    }

    #[test]
    fn header_trailing_text_ignored() {
        let doc = parse_document("[db.main] ; primary\nhost = h\n").unwrap();
        assert_eq!(doc.get("db.main", "host"), Some("h"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn header_name_runs_to_last_bracket() {
        let doc = parse_document("[db[1]]\nhost = h\n").unwrap();
        assert_eq!(doc.get("db[1]", "host"), Some("h"));
    }

    #[test]
    fn default_section_kept_in_document() {
        let doc = parse_document("[DEFAULT]\nport = 5432\n[db.a]\nhost = h\n").unwrap();
        assert_eq!(doc.get("DEFAULT", "port"), Some("5432"));
        assert_eq!(doc.get("db.a", "port"), None);
    }

    #[test]
    fn first_delimiter_splits() {
        let doc = parse_document("[s]\nurl = postgres://u:p@h/db\nmsg: a = b\n").unwrap();
        assert_eq!(doc.get("s", "url"), Some("postgres://u:p@h/db"));
        assert_eq!(doc.get("s", "msg"), Some("a = b"));
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let doc = parse_document("# top\n[s]\n; note\n\n  # indented comment\nkey = v\n").unwrap();
        assert_eq!(doc.section("s").unwrap().len(), 1);
    }

    #[test]
    fn empty_value_allowed() {
        let doc = parse_document("[s]\npassword =\n").unwrap();
        assert_eq!(doc.get("s", "password"), Some(""));
    }

    #[test]
    fn values_are_never_typed() {
        let doc = parse_document("[s]\nport = 5432\ndebug = true\n").unwrap();
        assert_eq!(doc.get("s", "port"), Some("5432"));
        assert_eq!(doc.get("s", "debug"), Some("true"));
    }

    #[test]
    fn continuation_lines_join_with_newline() {
        let doc = parse_document("[s]\nhosts = a\n    b\n    c\nnext = x\n").unwrap();
        assert_eq!(doc.get("s", "hosts"), Some("a\nb\nc"));
        assert_eq!(doc.get("s", "next"), Some("x"));
    }

    #[test]
    fn empty_section_kept() {
        let doc = parse_document("[empty]\n[s]\nk = v\n").unwrap();
        assert!(doc.contains_section("empty"));
    }

    #[test]
    fn key_before_header_fails() {
        let err = parse_document("host = h\n[s]\n").unwrap_err();
        assert_eq!(err, IniError::MissingSectionHeader { line: 1 });
    }

    #[test]
    fn unterminated_header_fails() {
        let err = parse_document("[s]\nk = v\n[broken\n").unwrap_err();
        assert_eq!(err, IniError::MalformedHeader { line: 3 });
    }

    #[test]
    fn empty_header_fails() {
        let err = parse_document("[  ]\n").unwrap_err();
        assert_eq!(err, IniError::MalformedHeader { line: 1 });
    }

    #[test]
    fn line_without_delimiter_fails() {
        let err = parse_document("[s]\njust some words\n").unwrap_err();
        assert_eq!(err, IniError::MissingDelimiter { line: 2 });
    }

    #[test]
    fn empty_key_fails() {
        let err = parse_document("[s]\n = value\n").unwrap_err();
        assert_eq!(err, IniError::EmptyKey { line: 2 });
    }

    #[test]
    fn duplicate_section_in_one_document_fails() {
        let err = parse_document("[s]\na = 1\n[s]\nb = 2\n").unwrap_err();
        assert!(matches!(err, IniError::DuplicateSection { line: 3, .. }));
    }

    #[test]
    fn duplicate_key_in_one_section_fails() {
        let err = parse_document("[s]\nport = 1\nPORT = 2\n").unwrap_err();
        match err {
            IniError::DuplicateOption { line, section, key } => {
                assert_eq!(line, 3);
                assert_eq!(section, "s");
                assert_eq!(key, "port");
            }
            other => panic!("Expected DuplicateOption, got: {other:?}"),
        }
    }

    #[test]
    fn empty_document_is_empty_mapping() {
        assert!(parse_document("").unwrap().is_empty());
    }
}
