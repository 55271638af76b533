//! Merge pipeline: fold every config source into one [`ConfigMapping`].
//!
//! [`resolve`] operates on pre-loaded data (`ResolveInput`) with no I/O, making
//! the merge rules testable with synthetic inputs. Steps:
//!
//! 1. Parse each file as an INI document
//! 2. Merge files in order (later overrides earlier, key by key)
//! 3. Merge the override mapping on top (highest priority)
//! 4. Fold `[DEFAULT]` keys into every other section
//!
//! [`parse`] is the I/O-performing front: it reads the candidate files and
//! hands their text to [`resolve`]. Any unreadable or malformed file aborts the
//! whole merge; there is no partial result.

use std::path::PathBuf;

use tracing::debug;

use crate::error::ConnfigError;
use crate::file;
use crate::ini;
use crate::mapping::ConfigMapping;
use crate::merge::{apply_defaults, merge};
use crate::types::CandidateFile;

/// All pre-loaded data needed to build a mapping. No I/O happens here.
#[derive(Debug, Default)]
pub struct ResolveInput {
    /// File contents in precedence order: first = lowest priority, last = highest.
    pub files: Vec<(PathBuf, String)>,
    /// Values layered on top of every file.
    pub overrides: ConfigMapping,
}

/// Merge pre-loaded file contents and overrides.
pub fn resolve(input: ResolveInput) -> Result<ConfigMapping, ConnfigError> {
    let mut merged = ConfigMapping::new();
    for (path, content) in input.files {
        let doc = ini::parse_document(&content)
            .map_err(|source| ConnfigError::ParseError { path: path.clone(), source })?;
        debug!(path = %path.display(), sections = doc.len(), "merging config file");
        merged = merge(merged, doc);
    }

    if !input.overrides.is_empty() {
        merged = merge(merged, input.overrides);
    }

    Ok(apply_defaults(merged))
}

/// Read `files` in order and merge them, then apply `overrides`.
pub fn parse(
    files: &[CandidateFile],
    overrides: Option<&ConfigMapping>,
) -> Result<ConfigMapping, ConnfigError> {
    let files = file::load_config_files(files)?;
    resolve(ResolveInput {
        files,
        overrides: overrides.cloned().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::IniError;
    use std::fs;
    use tempfile::TempDir;

    fn files(pairs: &[(&str, &str)]) -> Vec<(PathBuf, String)> {
        pairs
            .iter()
            .map(|(p, c)| (PathBuf::from(p), c.to_string()))
            .collect()
    }

    #[test]
    fn no_sources_empty_mapping() {
        let mapping = resolve(ResolveInput::default()).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn later_file_wins() {
        let input = ResolveInput {
            files: files(&[
                ("a.ini", "[db.x]\nport = 1\nhost = a\n"),
                ("b.ini", "[db.x]\nport = 2\n"),
            ]),
            ..Default::default()
        };
        let mapping = resolve(input).unwrap();
        assert_eq!(mapping.get("db.x", "port"), Some("2"));
        assert_eq!(mapping.get("db.x", "host"), Some("a"));
    }

    #[test]
    fn sections_missing_from_later_file_untouched() {
        let input = ResolveInput {
            files: files(&[
                ("a.ini", "[server]\nenv = prod\n[db.x]\nport = 1\n"),
                ("b.ini", "[db.x]\nport = 2\n"),
            ]),
            ..Default::default()
        };
        let mapping = resolve(input).unwrap();
        assert_eq!(mapping.get("server", "env"), Some("prod"));
    }

    #[test]
    fn overrides_beat_every_file() {
        let mut overrides = ConfigMapping::new();
        overrides.set("db.x", "port", "9999");
        let input = ResolveInput {
            files: files(&[
                ("a.ini", "[db.x]\nport = 1\n"),
                ("b.ini", "[db.x]\nport = 2\n"),
            ]),
            overrides,
        };
        let mapping = resolve(input).unwrap();
        assert_eq!(mapping.get("db.x", "port"), Some("9999"));
    }

    #[test]
    fn overrides_without_files() {
        let mut overrides = ConfigMapping::new();
        overrides.set("section_one", "name", "Hello");
        let mapping = resolve(ResolveInput {
            files: vec![],
            overrides,
        })
        .unwrap();
        assert_eq!(mapping.get("section_one", "name"), Some("Hello"));
    }

    #[test]
    fn defaults_reach_sections_in_other_files() {
        let input = ResolveInput {
            files: files(&[
                ("a.ini", "[db.x]\nhost = a\n"),
                ("b.ini", "[DEFAULT]\nport = 5432\nhost = shared\n"),
            ]),
            ..Default::default()
        };
        let mapping = resolve(input).unwrap();
        assert_eq!(mapping.get("db.x", "port"), Some("5432"));
        assert_eq!(mapping.get("db.x", "host"), Some("a"));
        assert_eq!(mapping.section_names().collect::<Vec<_>>(), vec!["db.x"]);
    }

    #[test]
    fn default_override_applies_everywhere() {
        let mut overrides = ConfigMapping::new();
        overrides.set("DEFAULT", "password", "");
        let input = ResolveInput {
            files: files(&[("a.ini", "[db.x]\nhost = a\n[db.y]\npassword = p\n")]),
            overrides,
        };
        let mapping = resolve(input).unwrap();
        assert_eq!(mapping.get("db.x", "password"), Some(""));
        assert_eq!(mapping.get("db.y", "password"), Some("p"));
    }

    #[test]
    fn same_file_twice_is_idempotent() {
        let content = "[db.x]\nport = 1\nhost = h\n";
        let once = resolve(ResolveInput {
            files: files(&[("a.ini", content)]),
            ..Default::default()
        })
        .unwrap();
        let twice = resolve(ResolveInput {
            files: files(&[("a.ini", content), ("a.ini", content)]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn malformed_file_aborts_with_path() {
        let input = ResolveInput {
            files: files(&[
                ("good.ini", "[s]\nk = v\n"),
                ("bad.ini", "no header here\n"),
            ]),
            ..Default::default()
        };
        let err = resolve(input).unwrap_err();
        match err {
            ConnfigError::ParseError { path, source } => {
                assert_eq!(path, PathBuf::from("bad.ini"));
                assert_eq!(source, IniError::MissingSectionHeader { line: 1 });
            }
            other => panic!("Expected ParseError, got: {other:?}"),
        }
    }

    #[test]
    fn parse_reads_candidates_in_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.ini");
        let b = dir.path().join("b.ini");
        fs::write(&a, "[db.x]\nport = 1\n").unwrap();
        fs::write(&b, "[db.x]\nport = 2\n").unwrap();

        let candidates = vec![
            CandidateFile::new(a, file::system_encoding()),
            CandidateFile::new(b, file::system_encoding()),
        ];
        let mapping = parse(&candidates, None).unwrap();
        assert_eq!(mapping.get("db.x", "port"), Some("2"));
    }

    #[test]
    fn parse_applies_overrides_last() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.ini");
        fs::write(&a, "[db.x]\nport = 1\n").unwrap();
        let mut overrides = ConfigMapping::new();
        overrides.set("db.x", "port", "3");

        let candidates = vec![CandidateFile::new(a, file::system_encoding())];
        let mapping = parse(&candidates, Some(&overrides)).unwrap();
        assert_eq!(mapping.get("db.x", "port"), Some("3"));
    }

    #[test]
    fn parse_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let candidates = vec![CandidateFile::new(
            dir.path().join("gone.ini"),
            file::system_encoding(),
        )];
        let result = parse(&candidates, None);
        assert!(matches!(result, Err(ConnfigError::IoError { .. })));
    }
}
