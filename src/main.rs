//! Handoff installer
//!
//! Installs the Handoff Manager system into a project directory: backs up an
//! existing `handoffs/` tree, writes the bundled files, and merges the
//! `.roomodes` custom mode registry and `.clinerules` rules document with
//! whatever the project already has.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod backup;
mod bundle;
mod cli;
mod commands;
mod common;
mod config;
mod error;
mod installer;
mod merge;
mod progress;
mod report;
mod transaction;

use cli::{Cli, Commands};

/// Default log level for the given verbosity flags
fn log_level(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(verbose, quiet)));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let quiet = matches!(&cli.command, Commands::Install(args) if args.quiet);
    init_logging(cli.verbose, quiet);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_defaults_to_info() {
        assert_eq!(log_level(false, false), "info");
    }

    #[test]
    fn test_log_level_verbose_wins_over_quiet() {
        assert_eq!(log_level(true, true), "debug");
        assert_eq!(log_level(false, true), "warn");
    }
}
