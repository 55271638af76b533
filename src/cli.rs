//! Clap adapter for connfig.
//!
//! Compiled only when the `clap` Cargo feature is enabled (on by default).
//! [`ConnfigArgs`] embeds into an application's clap derive and gives it
//! `config list|files|get|check|env` subcommands. The only bridge to the core
//! is [`ConnfigArgs::into_action()`]; everything after that flows through
//! [`ConnfigBuilder::handle()`](crate::ConnfigBuilder::handle).

use clap::{Args, Subcommand};

use crate::types::ConfigAction;

/// Clap-derived args for the `config` subcommand group.
///
/// ```ignore
/// #[derive(Subcommand)]
/// enum Commands {
///     Config(ConnfigArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConnfigArgs {
    #[command(subcommand)]
    pub action: Option<ConnfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConnfigSubcommand {
    /// Show every merged `section.key = value` pair.
    List {
        /// Print the merged configuration as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the config files that were found, in merge order.
    Files,
    /// Show a single field.
    Get {
        /// Section name (e.g. "db.main").
        section: String,
        /// Field name (e.g. "host").
        key: String,
    },
    /// Classify every section as a database connection.
    Check {
        /// Section-name prefix that marks a connection section.
        #[arg(long)]
        prefix: Option<String>,
        /// Don't require `schema` on network connections.
        #[arg(long)]
        no_schema: bool,
    },
    /// Show the resolved environment name.
    Env,
}

impl ConnfigArgs {
    /// Convert clap-parsed args into a framework-agnostic `ConfigAction`.
    ///
    /// Bare `config` (no subcommand) maps to a plain listing.
    pub fn into_action(self) -> ConfigAction {
        match self.action {
            None => ConfigAction::List { json: false },
            Some(ConnfigSubcommand::List { json }) => ConfigAction::List { json },
            Some(ConnfigSubcommand::Files) => ConfigAction::Files,
            Some(ConnfigSubcommand::Get { section, key }) => ConfigAction::Get { section, key },
            Some(ConnfigSubcommand::Check { prefix, no_schema }) => ConfigAction::Check {
                prefix,
                validate_schema: !no_schema,
            },
            Some(ConnfigSubcommand::Env) => ConfigAction::Env,
        }
    }
}
