//! Public data types shared across the discovery, parsing, and validation stages.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use encoding_rs::Encoding;

/// The three conventional directories searched for config files, in search order.
///
/// Each slot is optional: a platform without a system config directory, or a
/// user without a resolvable home, simply leaves that slot empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchDirectories {
    /// `config/` next to the running program.
    pub install: Option<PathBuf>,
    /// `/etc/<project>` on platforms that have one.
    pub system: Option<PathBuf>,
    /// `~/.<project>` (or the platform app-data equivalent).
    pub home: Option<PathBuf>,
}

impl SearchDirectories {
    pub fn new(install: Option<PathBuf>, system: Option<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            install,
            system,
            home,
        }
    }

    /// Present directories, in search order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [&self.install, &self.system, &self.home]
            .into_iter()
            .filter_map(|dir| dir.as_deref())
    }
}

/// A file that might hold configuration, and the encoding to read it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub encoding: &'static Encoding,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>, encoding: &'static Encoding) -> Self {
        Self {
            path: path.into(),
            encoding,
        }
    }
}

/// A caller-supplied config file, searched before the conventional locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplicitFile {
    /// Read with the default encoding.
    Path(PathBuf),
    /// Read with the encoding named by a WHATWG label (`"latin1"`, `"utf-16le"`, ...).
    Encoded { path: PathBuf, encoding: String },
}

impl From<PathBuf> for ExplicitFile {
    fn from(path: PathBuf) -> Self {
        ExplicitFile::Path(path)
    }
}

impl From<&Path> for ExplicitFile {
    fn from(path: &Path) -> Self {
        ExplicitFile::Path(path.to_path_buf())
    }
}

impl From<&str> for ExplicitFile {
    fn from(path: &str) -> Self {
        ExplicitFile::Path(PathBuf::from(path))
    }
}

impl<P: Into<PathBuf>, E: Into<String>> From<(P, E)> for ExplicitFile {
    fn from((path, encoding): (P, E)) -> Self {
        ExplicitFile::Encoded {
            path: path.into(),
            encoding: encoding.into(),
        }
    }
}

/// A database engine family named by a section's `dialect` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Sqlite,
    Access,
    Mysql,
    Postgresql,
    Oracle,
    Mssql,
    Firebird,
    Sybase,
    Informix,
    Drizzle,
    Maxdb,
}

impl Dialect {
    pub const ALL: [Dialect; 11] = [
        Dialect::Sqlite,
        Dialect::Access,
        Dialect::Mysql,
        Dialect::Postgresql,
        Dialect::Oracle,
        Dialect::Mssql,
        Dialect::Firebird,
        Dialect::Sybase,
        Dialect::Informix,
        Dialect::Drizzle,
        Dialect::Maxdb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Access => "access",
            Dialect::Mysql => "mysql",
            Dialect::Postgresql => "postgresql",
            Dialect::Oracle => "oracle",
            Dialect::Mssql => "mssql",
            Dialect::Firebird => "firebird",
            Dialect::Sybase => "sybase",
            Dialect::Informix => "informix",
            Dialect::Drizzle => "drizzle",
            Dialect::Maxdb => "maxdb",
        }
    }

    /// The database is a file on disk; the section only needs a `path`.
    pub fn is_file_based(self) -> bool {
        matches!(self, Dialect::Sqlite | Dialect::Access)
    }

    /// Network dialects that have no separate schema namespace.
    pub fn is_schema_less(self) -> bool {
        matches!(self, Dialect::Mysql)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Dialect::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unrecognized dialect '{wanted}'"))
    }
}

/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Every merged `section.key = value` pair.
    List { json: bool },
    /// The config files that were found, in merge order.
    Files,
    /// A single field.
    Get { section: String, key: String },
    /// Classify every section as a database connection.
    Check {
        prefix: Option<String>,
        validate_schema: bool,
    },
    /// The resolved environment name.
    Env,
}
