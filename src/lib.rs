//! Discover, merge, and validate database connection settings kept in INI
//! config files.
//!
//! connfig looks for config files under a fixed catalogue of conventional
//! names in three conventional places, merges them into one
//! section → key → value mapping, and decides which sections describe usable
//! database connections.
//!
//! ```ignore
//! let mapping = Connfig::builder()
//!     .project_name("myapp")
//!     .load()?;
//!
//! let classifier = ConnectionClassifier::new(&mapping);
//! if classifier.is_valid_connection_section("db.main")? {
//!     // hand the section to a connection factory
//! }
//! ```
//!
//! # Where files are found
//!
//! Three directories are searched, in this order:
//!
//! | Slot    | Location                                                |
//! |---------|---------------------------------------------------------|
//! | install | `config/` beside the running executable                 |
//! | system  | `/etc/<project>` (not on Windows or unknown platforms)  |
//! | home    | `~/.<project>` (the app-data directory on Windows)      |
//!
//! In each directory every name in [`file::FILENAME_ROOTS`] is tried with
//! every extension in [`file::FILENAME_EXTENSIONS`], plain and as a hidden
//! dotfile: `db.ini`, `.db.ini`, `connections.cfg`, `setup`, ... Only files
//! that exist are read. Files added with
//! [`file()`](ConnfigBuilder::file) go first.
//!
//! # Layer precedence
//!
//! ```text
//! Explicit files        .file(), in call order
//!        ↑ overridden by
//! Install directory
//!        ↑ overridden by
//! System directory
//!        ↑ overridden by
//! Home directory
//!        ↑ overridden by
//! Overrides             .overrides() / .override_value() / .cli_override()
//! ```
//!
//! Merging is key by key: a later file replaces single fields of a section
//! and leaves the others alone. A malformed file stops the whole load.
//!
//! # Connection sections
//!
//! A section is a connection section when its name starts with the prefix
//! (`db` by default), it is not switched off with `ignore = yes`, and it
//! names a known `dialect`. File dialects need an existing `path`; network
//! dialects need `host`, `port`, `username`, `password`, `database`, and
//! (except for `mysql`) `schema`. See [`classify`] for the exact rules and
//! [`validate`] for each field check.
//!
//! [`collect`] turns every valid section into a [`ConnectionDescriptor`].
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) provides
//! [`ConnfigArgs`], which gives an application `config list|files|get|check|env`
//! subcommands. To use connfig without clap:
//!
//! ```toml
//! connfig = { version = "...", default-features = false }
//! ```
//!
//! # Logging
//!
//! connfig emits [`tracing`](https://docs.rs/tracing) events and never
//! installs a subscriber. Found files, merged files, ignored sections, and
//! the environment fallback are logged at `debug`.
//!
//! # Error handling
//!
//! All fallible operations return [`ConnfigError`]. A validator that only
//! finds an incomplete section answers `false`; errors are for sections that
//! are missing, malformed, or cannot be read.

pub mod classify;
pub mod error;
pub mod file;
pub mod ini;
pub mod mapping;
pub mod paths;
pub mod resolve;
pub mod types;
pub mod validate;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod connections;
mod environment;
pub(crate) mod merge;
mod ops;
mod overrides;

#[cfg(test)]
mod fixtures;

pub use builder::{Connfig, ConnfigBuilder};
pub use classify::{Classification, ConnectionClassifier};
#[cfg(feature = "clap")]
pub use cli::{ConnfigArgs, ConnfigSubcommand};
pub use connections::{ConnectionDescriptor, ConnectionReport, ErrorPolicy, Target, collect};
pub use environment::Environment;
pub use error::ConnfigError;
pub use ini::IniError;
pub use mapping::ConfigMapping;
pub use ops::{ConfigResult, SectionStatus};
pub use resolve::parse;
pub use types::{CandidateFile, ConfigAction, Dialect, ExplicitFile, SearchDirectories};
