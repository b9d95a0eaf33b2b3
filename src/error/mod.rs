//! Error types and handling for the handoff installer
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Constructors are grouped by error domain:
//! - [`backup`]: Installation backup errors
//! - [`bundle`]: Bundle loading and path validation errors
//! - [`config`]: Install configuration errors
//! - [`fs`]: File system errors
//! - [`merge`]: Reserved config file merge errors

pub mod backup;
pub mod bundle;
pub mod config;
pub mod fs;
pub mod merge;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for installer operations
#[derive(Error, Diagnostic, Debug)]
pub enum HandoffError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(handoff::config::not_found),
        help("Pass an existing JSON or YAML file with --config, or omit it to use defaults")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(handoff::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(handoff::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // Bundle errors
    #[error("Bundle directory not found: {path}")]
    #[diagnostic(
        code(handoff::bundle::not_found),
        help("Point --bundle at the directory produced by the publisher")
    )]
    BundleNotFound { path: String },

    #[error("Invalid bundle path '{path}': {reason}")]
    #[diagnostic(
        code(handoff::bundle::invalid_path),
        help("Bundle paths must be relative and must not contain '..' segments")
    )]
    InvalidBundlePath { path: String, reason: String },

    // Merge errors
    #[error("Invalid mode registry: {path}: {reason}")]
    #[diagnostic(
        code(handoff::merge::invalid_registry),
        help("A mode registry must be a JSON object with a \"customModes\" array")
    )]
    InvalidModeRegistry { path: String, reason: String },

    #[error("Incoming {kind} file not found: {path}")]
    #[diagnostic(code(handoff::merge::incoming_missing))]
    IncomingMissing { kind: String, path: String },

    // Backup errors
    #[error("Failed to back up '{component}' to {path}: {reason}")]
    #[diagnostic(code(handoff::backup::copy_failed))]
    BackupFailed {
        component: String,
        path: String,
        reason: String,
    },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(handoff::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(handoff::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(handoff::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    // Install errors
    #[error("Installation finished with {errors} error(s)")]
    #[diagnostic(
        code(handoff::install::incomplete),
        help("See the report above; previous data was kept in the backups it lists")
    )]
    InstallIncomplete { errors: usize },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(handoff::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(handoff::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for HandoffError {
    fn from(err: std::io::Error) -> Self {
        HandoffError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for HandoffError {
    fn from(err: serde_yaml::Error) -> Self {
        HandoffError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for HandoffError {
    fn from(err: serde_json::Error) -> Self {
        HandoffError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, HandoffError>;
