//! Command-line front end for `toolgram`.
//!
//! The entry point is [`run`], which parses arguments, installs the tracing
//! subscriber, and dispatches to a command handler. Handlers resolve their
//! configuration through `toolgram-state`, load transcripts with
//! `toolgram-sessions`, analyze them with `toolgram-patterns`, and print a
//! report rendered by [`report`].

#![deny(unsafe_code)]

mod cli;
mod commands;
pub mod report;

pub use cli::{Cli, Commands, DetectionArgs, OutputFormat};

use anyhow::Result;
use clap::Parser;
use commands::{handle_analyze_command, handle_patterns_command, handle_sessions_command};
use tracing_subscriber::EnvFilter;

/// The main entry point for the `toolgram` application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.is_verbose());
    dispatch(cli)
}

/// Log to stderr. `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            session,
            days,
            format,
            verbose,
            no_patterns,
            detection,
            projects_dir,
        } => handle_analyze_command(
            session,
            days,
            format,
            verbose,
            no_patterns,
            detection,
            projects_dir,
        ),
        Commands::Sessions {
            days,
            project,
            format,
            projects_dir,
        } => handle_sessions_command(days, project, format, projects_dir),
        Commands::Patterns {
            session,
            find,
            format,
            detection,
            projects_dir,
        } => handle_patterns_command(session, find, format, detection, projects_dir),
    }
}
