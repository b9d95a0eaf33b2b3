//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod completions;
pub mod install;

pub use completions::CompletionsArgs;
pub use install::InstallArgs;

/// Handoff installer
///
/// Installs the Handoff Manager system into a project directory.
#[derive(Parser, Debug)]
#[command(
    name = "handoff-installer",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Installs the Handoff Manager system into a project",
    long_about = "Installs the Handoff Manager (handoff documents, milestone tooling, the \
                  handoff-manager custom mode and its rules) into a project directory. Existing \
                  handoffs are backed up and existing .roomodes / .clinerules are merged, never \
                  replaced.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  handoff-installer install --bundle ./dist            \x1b[90m# Install into the current directory\x1b[0m\n   \
                  handoff-installer install ../app --bundle ./dist     \x1b[90m# Install into ../app\x1b[0m\n   \
                  handoff-installer install --bundle ./dist --no-backup \x1b[90m# Skip the handoffs backup\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a bundle into a target directory
    Install(InstallArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["handoff-installer", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parsing_global_verbose() {
        let cli = Cli::try_parse_from(["handoff-installer", "completions", "bash", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "bash"),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["handoff-installer"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
