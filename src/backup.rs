//! Backup of a previous installation
//!
//! Before any file is written, each install component that already exists in
//! the target is deep-copied to the first free `<name>-backup`,
//! `<name>-backup-1`, `<name>-backup-2`, ... sibling. The original is never
//! moved or modified and an existing backup is never overwritten.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::common::fs::{copy_dir_recursive, path_occupied};
use crate::error::{self, Result};
use crate::report::{Issue, Step};

/// Directory holding the installed handoff system
pub const HANDOFFS_DIR: &str = "handoffs";

/// Components of a previous installation that get backed up
pub const INSTALL_COMPONENTS: &[&str] = &[HANDOFFS_DIR];

/// Component name to the backup path created for it
pub type BackupRecord = BTreeMap<String, PathBuf>;

/// Result of backing up a target directory
#[derive(Debug, Default)]
pub struct BackupOutcome {
    pub record: BackupRecord,
    pub issues: Vec<Issue>,
}

/// Back up every install component present in `target_dir`
///
/// Components that are absent are skipped. A component whose copy fails is
/// left out of the record, its partial copy is removed and the failure is
/// reported as a warning; the remaining components are still processed.
pub fn backup_existing_installation(target_dir: &Path) -> BackupOutcome {
    info!(
        "Checking for an existing installation in {}",
        target_dir.display()
    );

    let mut outcome = BackupOutcome::default();

    for component in INSTALL_COMPONENTS {
        let original = target_dir.join(component);
        if !original.is_dir() {
            debug!("No existing {component} directory, nothing to back up");
            continue;
        }

        match backup_component(component, &original) {
            Ok(backup) => {
                info!("Backed up {component} to {}", backup.display());
                outcome.record.insert((*component).to_string(), backup);
            }
            Err(e) => {
                error!("Backup of {component} failed: {e}");
                outcome
                    .issues
                    .push(Issue::warning(Step::Backup, *component, e.to_string()));
            }
        }
    }

    outcome
}

/// First unoccupied backup path for `original`
pub fn next_backup_path(original: &Path) -> PathBuf {
    let parent = original.parent().unwrap_or_else(|| Path::new(""));
    let name = original
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let candidate = parent.join(format!("{name}-backup"));
    if !path_occupied(&candidate) {
        return candidate;
    }

    let mut counter = 1u32;
    loop {
        let candidate = parent.join(format!("{name}-backup-{counter}"));
        if !path_occupied(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn backup_component(component: &str, original: &Path) -> Result<PathBuf> {
    let backup = next_backup_path(original);

    match copy_dir_recursive(original, &backup) {
        Ok(copied) => {
            debug!("Copied {copied} file(s) into {}", backup.display());
            Ok(backup)
        }
        Err(e) => {
            if path_occupied(&backup) {
                if let Err(cleanup) = fs::remove_dir_all(&backup) {
                    warn!(
                        "Could not remove partial backup {}: {cleanup}",
                        backup.display()
                    );
                }
            }
            Err(error::backup::copy_failed(
                component,
                backup.display().to_string(),
                e.to_string(),
            ))
        }
    }
}
