//! # connfig demo application
//!
//! A sample CLI tool that shows how to wire [connfig](https://docs.rs/connfig)
//! into an application that needs database connections. It never opens a
//! connection; it only reports what it would connect to.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example connfig_demo -- connections
//! RUST_LOG=connfig=debug cargo run --example connfig_demo -- config files
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                | How to exercise it                                                 |
//! |------------------------|--------------------------------------------------------------------|
//! | Conventional locations | Place `db.ini` under `~/.connfig-demo/` or `/etc/connfig-demo/`    |
//! | Explicit file          | `cargo run --example connfig_demo -- --file ./local.ini connections` |
//! | Dotted override        | `cargo run --example connfig_demo -- --set db.main.port=6543 connections` |
//! | `config list`          | `cargo run --example connfig_demo -- config list --json`           |
//! | `config check`         | `cargo run --example connfig_demo -- config check --no-schema`     |
//! | Lenient collection     | `cargo run --example connfig_demo -- connections --skip-errors`    |
//! | Debug logging          | `RUST_LOG=connfig=debug` with any command                          |

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use connfig::{
    Connfig, ConnfigArgs, ConnfigBuilder, ConnectionClassifier, Environment, ErrorPolicy, Target,
    collect,
};

/// connfig demo: report the database connections a project is configured for.
#[derive(Parser, Debug)]
#[command(name = "connfig-demo")]
struct Cli {
    /// Extra config file, read before the conventional locations.
    #[arg(long, global = true)]
    file: Vec<PathBuf>,

    /// Encoding for config files without their own (e.g. "latin1").
    #[arg(long, global = true)]
    encoding: Option<String>,

    /// Override a field as `section.key=value`. May be repeated.
    #[arg(long = "set", global = true, value_parser = parse_assignment)]
    set: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every valid connection section.
    Connections {
        /// Section-name prefix that marks a connection section.
        #[arg(long, default_value = "db")]
        prefix: String,
        /// Report broken sections instead of stopping at the first one.
        #[arg(long)]
        skip_errors: bool,
    },
    /// Inspect the merged configuration (list, files, get, check, env).
    Config(ConnfigArgs),
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected 'section.key=value', got '{raw}'"))
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
}

fn make_builder(cli: &Cli) -> ConnfigBuilder {
    let mut builder = Connfig::builder().project_name("connfig-demo");
    for path in &cli.file {
        builder = builder.file(path.clone());
    }
    if let Some(label) = &cli.encoding {
        builder = builder.default_encoding(label);
    }
    for (key, value) in &cli.set {
        builder = builder.cli_override(key, Some(value));
    }
    builder
}

fn print_connections(
    builder: &ConnfigBuilder,
    prefix: &str,
    policy: ErrorPolicy,
) -> Result<(), connfig::ConnfigError> {
    let mapping = builder.load()?;
    let classifier = ConnectionClassifier::builder(&mapping).prefix(prefix).build();
    let report = collect(&classifier, policy)?;

    println!("environment: {}", Environment::new(&mapping).resolve());
    for conn in &report.connections {
        match &conn.target {
            Target::File { path } => {
                println!(
                    "{:<16} {:<10} {}",
                    conn.name,
                    conn.dialect.as_str(),
                    path.display()
                );
            }
            Target::Network {
                host,
                port,
                database,
                ..
            } => {
                println!(
                    "{:<16} {:<10} {host}:{port}/{database}",
                    conn.name,
                    conn.dialect.as_str()
                );
            }
        }
    }
    for (section, error) in &report.skipped {
        eprintln!("skipped {section}: {error}");
    }
    Ok(())
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let builder = make_builder(&cli);

    let result = match cli.command {
        Commands::Connections {
            prefix,
            skip_errors,
        } => {
            let policy = if skip_errors {
                ErrorPolicy::Skip
            } else {
                ErrorPolicy::Abort
            };
            print_connections(&builder, &prefix, policy)
        }
        Commands::Config(args) => builder.handle_and_print(&args.into_action()),
    };

    if let Err(e) = result {
        eprintln!("Config error:\n{e}");
        std::process::exit(1);
    }
}
