use std::path::PathBuf;

use encoding_rs::Encoding;
use tracing::debug;

use crate::error::ConnfigError;
use crate::file;
use crate::mapping::ConfigMapping;
use crate::merge::merge;
use crate::ops::{self, ConfigResult};
use crate::overrides;
use crate::paths;
use crate::resolve;
use crate::types::{CandidateFile, ConfigAction, ExplicitFile, SearchDirectories};

/// Entry point for discovering and loading connection configuration.
pub struct Connfig;

impl Connfig {
    pub fn builder() -> ConnfigBuilder {
        ConnfigBuilder::new()
    }
}

/// Builder for discovering, merging, and inspecting configuration.
///
/// Sources, lowest priority first:
///
/// - Conventional files in the install, system, and home directories
///   (see [`search_directories()`](Self::search_directories)).
/// - Explicit files added with [`file()`](Self::file), which are read before
///   the conventional ones and so lose to them on conflicting keys.
/// - Override layers: [`overrides()`](Self::overrides),
///   [`overrides_from_toml()`](Self::overrides_from_toml), and
///   [`override_value()`](Self::override_value), in call order.
/// - Dotted [`cli_override()`](Self::cli_override) values, always last.
#[derive(Debug, Clone, Default)]
pub struct ConnfigBuilder {
    project_name: Option<String>,
    explicit_files: Vec<ExplicitFile>,
    search_directories: Option<SearchDirectories>,
    default_encoding: Option<String>,
    override_layers: ConfigMapping,
    cli_overrides: Vec<(String, String)>,
}

impl ConnfigBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the project name. Derives the default search directories:
    /// `config/` beside the executable, `/etc/{name}`, and `~/.{name}`.
    pub fn project_name(mut self, name: &str) -> Self {
        self.project_name = Some(name.to_string());
        self
    }

    /// Add a file searched before the conventional locations, read with the
    /// default encoding. Missing files are skipped like any other candidate.
    pub fn file(mut self, file: impl Into<ExplicitFile>) -> Self {
        self.explicit_files.push(file.into());
        self
    }

    /// Add an explicit file with its own encoding label (`"latin1"`, `"utf-16le"`, ...).
    pub fn file_with_encoding(mut self, path: impl Into<PathBuf>, encoding: &str) -> Self {
        self.explicit_files.push(ExplicitFile::Encoded {
            path: path.into(),
            encoding: encoding.to_string(),
        });
        self
    }

    /// Replace the directories derived from the project name.
    pub fn search_directories(mut self, dirs: SearchDirectories) -> Self {
        self.search_directories = Some(dirs);
        self
    }

    /// Encoding label for files without their own (default: UTF-8).
    pub fn default_encoding(mut self, label: &str) -> Self {
        self.default_encoding = Some(label.to_string());
        self
    }

    /// Override a single field.
    pub fn override_value(mut self, section: &str, key: &str, value: impl Into<String>) -> Self {
        self.override_layers.set(section, &key.to_lowercase(), value);
        self
    }

    /// Add a `"section.key"` override. `None` values are ignored (useful for optional clap args).
    pub fn cli_override<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.cli_overrides.push((key.to_string(), v.to_string()));
        }
        self
    }

    /// Layer a whole mapping over the files.
    pub fn overrides(mut self, mapping: ConfigMapping) -> Self {
        self.override_layers = merge(self.override_layers, mapping);
        self
    }

    /// Layer a TOML document over the files. Top-level tables are sections.
    pub fn overrides_from_toml(self, content: &str) -> Result<Self, ConnfigError> {
        let mapping = overrides::toml_to_mapping(content)?;
        Ok(self.overrides(mapping))
    }

    fn effective_project_name(&self) -> Result<&str, ConnfigError> {
        self.project_name
            .as_deref()
            .ok_or(ConnfigError::ProjectNameRequired)
    }

    fn effective_search_directories(&self) -> Result<SearchDirectories, ConnfigError> {
        let project = self.effective_project_name()?;
        if let Some(dirs) = &self.search_directories {
            return Ok(dirs.clone());
        }
        Ok(paths::search_directories(project))
    }

    fn effective_encoding(&self) -> Result<&'static Encoding, ConnfigError> {
        match &self.default_encoding {
            Some(label) => file::resolve_encoding(label),
            None => Ok(file::system_encoding()),
        }
    }

    fn effective_overrides(&self) -> Result<ConfigMapping, ConnfigError> {
        let dotted = overrides::overrides_to_mapping(&self.cli_overrides)?;
        Ok(merge(self.override_layers.clone(), dotted))
    }

    /// The config files that exist, in merge order.
    pub fn discover(&self) -> Result<Vec<CandidateFile>, ConnfigError> {
        let dirs = self.effective_search_directories()?;
        let encoding = self.effective_encoding()?;
        file::enumerate(&dirs, &self.explicit_files, encoding)
    }

    /// Discover, read, and merge every config file, then apply the overrides.
    pub fn load(&self) -> Result<ConfigMapping, ConnfigError> {
        let overrides = self.effective_overrides()?;
        let files = self.discover()?;
        let mapping = resolve::parse(&files, Some(&overrides))?;
        debug!(
            files = files.len(),
            sections = mapping.len(),
            "configuration loaded"
        );
        Ok(mapping)
    }

    /// Handle a `ConfigAction` and print the result to stdout.
    pub fn handle_and_print(&self, action: &ConfigAction) -> Result<(), ConnfigError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle a `ConfigAction` (list / files / get / check / env).
    pub fn handle(&self, action: &ConfigAction) -> Result<ConfigResult, ConnfigError> {
        match action {
            ConfigAction::List { json } => {
                let mapping = self.load()?;
                if *json {
                    ops::list_json(&mapping)
                } else {
                    Ok(ops::list_values(&mapping))
                }
            }
            ConfigAction::Files => {
                let paths = self.discover()?.into_iter().map(|f| f.path).collect();
                Ok(ConfigResult::Files { paths })
            }
            ConfigAction::Get { section, key } => {
                let mapping = self.load()?;
                ops::get_value(&mapping, section, key)
            }
            ConfigAction::Check {
                prefix,
                validate_schema,
            } => {
                let mapping = self.load()?;
                Ok(ops::check_sections(
                    &mapping,
                    prefix.as_deref(),
                    *validate_schema,
                ))
            }
            ConfigAction::Env => {
                let mapping = self.load()?;
                Ok(ops::environment(&mapping))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::write_config;
    use crate::ops::SectionStatus;
    use crate::types::Dialect;
    use tempfile::TempDir;

    fn dirs_in(root: &TempDir) -> SearchDirectories {
        SearchDirectories::new(
            Some(root.path().join("install")),
            Some(root.path().join("system")),
            Some(root.path().join("home")),
        )
    }

    fn builder_in(root: &TempDir) -> ConnfigBuilder {
        Connfig::builder()
            .project_name("myapp")
            .search_directories(dirs_in(root))
    }

    #[test]
    fn project_name_is_required() {
        let result = Connfig::builder().load();
        assert!(matches!(result, Err(ConnfigError::ProjectNameRequired)));
    }

    #[test]
    fn project_name_derives_directories() {
        let builder = Connfig::builder().project_name("myapp");
        let dirs = builder.effective_search_directories().unwrap();
        assert_eq!(dirs, paths::search_directories("myapp"));
    }

    #[test]
    fn search_directories_replace_defaults() {
        let dir = TempDir::new().unwrap();
        let builder = builder_in(&dir);
        assert_eq!(builder.effective_search_directories().unwrap(), dirs_in(&dir));
    }

    #[test]
    fn default_encoding_is_utf8() {
        let builder = Connfig::builder();
        assert_eq!(builder.effective_encoding().unwrap(), encoding_rs::UTF_8);
    }

    #[test]
    fn default_encoding_label_resolves() {
        let builder = Connfig::builder().default_encoding("latin1");
        assert_eq!(
            builder.effective_encoding().unwrap(),
            encoding_rs::WINDOWS_1252
        );
    }

    #[test]
    fn unknown_default_encoding_errors() {
        let dir = TempDir::new().unwrap();
        let result = builder_in(&dir).default_encoding("klingon").load();
        assert!(matches!(result, Err(ConnfigError::UnknownEncoding(_))));
    }

    #[test]
    fn cli_override_none_ignored() {
        let builder = Connfig::builder().cli_override::<u16>("db.main.port", None);
        assert!(builder.cli_overrides.is_empty());
    }

    #[test]
    fn cli_override_some_added() {
        let builder = Connfig::builder().cli_override("db.main.port", Some(3306));
        assert_eq!(
            builder.cli_overrides,
            vec![("db.main.port".to_string(), "3306".to_string())]
        );
    }

    #[test]
    fn cli_override_beats_other_layers() {
        let builder = Connfig::builder()
            .cli_override("db.main.port", Some("1"))
            .override_value("db.main", "port", "2");
        let overrides = builder.effective_overrides().unwrap();
        assert_eq!(overrides.get("db.main", "port"), Some("1"));
    }

    #[test]
    fn override_layers_apply_in_call_order() {
        let builder = Connfig::builder()
            .override_value("server", "env", "qa")
            .overrides_from_toml("[server]\nenv = \"prod\"\n")
            .unwrap();
        let overrides = builder.effective_overrides().unwrap();
        assert_eq!(overrides.get("server", "env"), Some("prod"));
    }

    #[test]
    fn invalid_cli_override_key_fails_on_load() {
        let dir = TempDir::new().unwrap();
        let result = builder_in(&dir).cli_override("port", Some(1)).load();
        assert!(matches!(result, Err(ConnfigError::InvalidOverride { .. })));
    }

    #[test]
    fn load_with_no_files_is_empty() {
        let dir = TempDir::new().unwrap();
        let mapping = builder_in(&dir).load().unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn load_merges_directories_in_order() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("system"),
            "db.ini",
            "[db.main]\nhost = system\nport = 5432\n",
        );
        write_config(&dir.path().join("home"), ".db.ini", "[db.main]\nhost = home\n");

        let mapping = builder_in(&dir).load().unwrap();
        assert_eq!(mapping.get("db.main", "host"), Some("home"));
        assert_eq!(mapping.get("db.main", "port"), Some("5432"));
    }

    #[test]
    fn explicit_file_loses_to_conventional_files() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("custom.conf");
        std::fs::write(&explicit, "[server]\nenv = explicit\nname = x\n").unwrap();
        write_config(&dir.path().join("install"), "server.cfg", "[server]\nenv = install\n");

        let mapping = builder_in(&dir).file(explicit).load().unwrap();
        assert_eq!(mapping.get("server", "env"), Some("install"));
        assert_eq!(mapping.get("server", "name"), Some("x"));
    }

    #[test]
    fn explicit_file_with_encoding() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("latin.ini");
        // "café" in latin-1
        std::fs::write(&explicit, b"[server]\nname = caf\xe9\n").unwrap();

        let mapping = builder_in(&dir)
            .file_with_encoding(&explicit, "latin1")
            .load()
            .unwrap();
        assert_eq!(mapping.get("server", "name"), Some("café"));
    }

    #[test]
    fn overrides_win_over_files() {
        let dir = TempDir::new().unwrap();
        write_config(&dir.path().join("home"), "db.ini", "[db.main]\nport = 5432\n");

        let mapping = builder_in(&dir)
            .cli_override("db.main.port", Some(6543))
            .load()
            .unwrap();
        assert_eq!(mapping.get("db.main", "port"), Some("6543"));
    }

    #[test]
    fn malformed_file_aborts_load() {
        let dir = TempDir::new().unwrap();
        write_config(&dir.path().join("home"), "db.ini", "port = 5432\n");

        let result = builder_in(&dir).load();
        assert!(matches!(result, Err(ConnfigError::ParseError { .. })));
    }

    #[test]
    fn handle_files_lists_discovered_paths() {
        let dir = TempDir::new().unwrap();
        write_config(&dir.path().join("system"), "db.ini", "[a]\nb = c\n");
        write_config(&dir.path().join("home"), ".config", "[a]\nb = d\n");

        let result = builder_in(&dir).handle(&ConfigAction::Files).unwrap();
        assert_eq!(
            result,
            ConfigResult::Files {
                paths: vec![
                    dir.path().join("system").join("db.ini"),
                    dir.path().join("home").join(".config"),
                ]
            }
        );
    }

    #[test]
    fn handle_get() {
        let dir = TempDir::new().unwrap();
        write_config(&dir.path().join("home"), "db.ini", "[db.main]\nhost = h\n");

        let action = ConfigAction::Get {
            section: "db.main".into(),
            key: "host".into(),
        };
        let result = builder_in(&dir).handle(&action).unwrap();
        assert_eq!(result.to_string(), "db.main.host = h");
    }

    #[test]
    fn handle_list_json() {
        let dir = TempDir::new().unwrap();
        write_config(&dir.path().join("home"), "db.ini", "[server]\nenv = prod\n");

        let result = builder_in(&dir)
            .handle(&ConfigAction::List { json: true })
            .unwrap();
        assert!(matches!(result, ConfigResult::Json(ref s) if s.contains("\"prod\"")));
    }

    #[test]
    fn handle_check() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join("home"),
            "db.ini",
            "[db.main]\ndialect = mysql\nhost = h\nport = 3306\nusername = u\npassword =\ndatabase = d\n",
        );

        let action = ConfigAction::Check {
            prefix: None,
            validate_schema: true,
        };
        let result = builder_in(&dir).handle(&action).unwrap();
        assert_eq!(
            result,
            ConfigResult::Check {
                rows: vec![("db.main".into(), SectionStatus::Valid(Dialect::Mysql))]
            }
        );
    }

    #[test]
    fn handle_env() {
        let dir = TempDir::new().unwrap();
        let result = builder_in(&dir)
            .override_value("server", "env", "stage")
            .handle(&ConfigAction::Env)
            .unwrap();
        assert_eq!(result, ConfigResult::Environment("stage".into()));
    }
}
