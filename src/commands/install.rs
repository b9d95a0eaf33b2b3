//! Install command implementation
//!
//! The installation process:
//! 1. Load the install configuration (or use defaults)
//! 2. Apply command line overrides
//! 3. Resolve and create the target directory
//! 4. Load the bundle from disk
//! 5. Run the installer and print its report

use std::path::{Path, PathBuf};

use normpath::PathExt;
use tracing::{debug, info, warn};

use crate::bundle::FileBundle;
use crate::cli::InstallArgs;
use crate::config::{InstallConfig, InstallOptions};
use crate::error::{self, HandoffError, Result};
use crate::installer::Installer;
use crate::progress::{InteractiveProgressReporter, ProgressReporter, SilentProgressReporter};

/// Run install command
pub fn run(args: InstallArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            debug!("Loading install configuration from {}", path.display());
            InstallConfig::load(path)?
        }
        None => InstallConfig::default(),
    };
    apply_overrides(&mut config.install_options, &args);

    let target = resolve_target(args.target.as_deref())?;
    let bundle = FileBundle::from_dir(&args.bundle, config.max_file_size)?;
    if bundle.is_empty() {
        warn!("Bundle {} contains no files", args.bundle.display());
    } else {
        info!(
            "Loaded {} file(s) from {}",
            bundle.len(),
            args.bundle.display()
        );
    }

    let progress: Box<dyn ProgressReporter> = if args.quiet {
        Box::new(SilentProgressReporter)
    } else {
        Box::new(InteractiveProgressReporter::new())
    };

    let report = Installer::new(&config, progress).install(&target, &bundle);
    report.print();

    if report.is_success() {
        Ok(())
    } else {
        Err(HandoffError::InstallIncomplete {
            errors: report.errors().count(),
        })
    }
}

fn apply_overrides(options: &mut InstallOptions, args: &InstallArgs) {
    if args.no_backup {
        options.create_backups = false;
    }
    if args.no_merge_modes {
        options.merge_roomodes = false;
    }
    if args.no_merge_rules {
        options.merge_clinerules = false;
    }
    if args.no_config_backup {
        options.backup_config_files = false;
    }
}

/// Absolute target directory, created when missing
fn resolve_target(target: Option<&Path>) -> Result<PathBuf> {
    let target = match target {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };

    if !target.exists() {
        std::fs::create_dir_all(&target).map_err(|e| error::fs::write_error(&target, &e))?;
        info!("Created target directory {}", target.display());
    }

    Ok(target
        .normalize()
        .map(normpath::BasePathBuf::into_path_buf)
        .unwrap_or(target))
}
