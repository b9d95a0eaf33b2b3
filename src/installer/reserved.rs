//! Reserved config file merging
//!
//! Each reserved file is merged inside its own [`MergeTransaction`]: the
//! bundle's copy is staged next to the target, the target is snapshotted, and
//! a failed merge puts the target back the way it was.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::bundle::{FileBundle, ReservedFile};
use crate::error::{self, HandoffError, Result};
use crate::merge::{merge_mode_registry, merge_rules_document};
use crate::report::{Issue, MergedFile, Step};
use crate::transaction::MergeTransaction;

/// Registry used when the bundle carries no `.roomodes`
pub const FALLBACK_MODE_REGISTRY: &str = r#"{
  "customModes": [
    {
      "slug": "handoff-manager",
      "name": "Handoff Manager",
      "roleDefinition": "You are Roo, a comprehensive Handoff System Manager. You help users create, organize, and utilize handoff and milestone documents to maintain optimal context between LLM sessions.",
      "groups": [
        "read",
        [
          "edit",
          {
            "fileRegex": ".*/handoffs/(?!0-system/chat_history/).*\\.md$|.*/[0-9]+-.*?/.*\\.md$|.*/[0-9]+-.*\\.md$|\\.clinerules$",
            "description": "Handoff and milestone documents, and project rules"
          }
        ],
        "command"
      ],
      "customInstructions": "Follow the handoff system guidelines to create and manage handoff documents."
    }
  ]
}"#;

/// Rules used when the bundle carries no `.clinerules`
pub const FALLBACK_RULES: &str = "# Handoff System Rules

## File Safety
- Never delete handoff documents without explicit confirmation
- Use versioning when making major changes to documents
- Keep handoff numbering sequential

## Structure Rules
- Place handoff documents directly in the handoffs/ root directory
- Place chat history files only in the 0-system/chat_history directory
- Use the 0-system directory only for system files, not handoffs

## Workflow Guidelines
- Run extraction scripts before attempting to read conversation files
- Verify files moved to milestone directories have been copied correctly
- Always document deviations from original plans
";

/// Built-in content for a reserved file
pub fn fallback_content(file: ReservedFile) -> &'static str {
    match file {
        ReservedFile::ModeRegistry => FALLBACK_MODE_REGISTRY,
        ReservedFile::Rules => FALLBACK_RULES,
    }
}

/// Merge the bundle's copy of `file` into `target_dir`
///
/// Warnings (fallback content, failed `.bak` copy) are pushed to `issues`.
/// On error the target file holds its pre-merge content.
pub fn merge_reserved_file(
    target_dir: &Path,
    file: ReservedFile,
    bundle: &FileBundle,
    keep_config_backup: bool,
    issues: &mut Vec<Issue>,
) -> Result<MergedFile> {
    let target = target_dir.join(file.path());
    info!("Merging {} into {}", file.label(), target.display());

    let incoming = bundle.get(file.path()).unwrap_or_else(|| {
        warn!(
            "{} missing from the bundle, using built-in defaults",
            file.path()
        );
        issues.push(Issue::warning(
            Step::Merge,
            file.path(),
            "not in the bundle; installed built-in defaults",
        ));
        fallback_content(file)
    });

    let config_backup = if keep_config_backup && target.is_file() {
        match create_config_backup(&target) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Could not back up {}: {e}", target.display());
                issues.push(Issue::warning(Step::Merge, file.path(), e.to_string()));
                None
            }
        }
    } else {
        None
    };

    let mut transaction = MergeTransaction::begin(&target, incoming)?;
    let merged = match file {
        ReservedFile::ModeRegistry => {
            merge_mode_registry(transaction.existing(), transaction.incoming_path(), &target)
                .map(|outcome| outcome.describe())
        }
        ReservedFile::Rules => {
            merge_rules_document(transaction.existing(), transaction.incoming_path(), &target)
                .map(|outcome| outcome.describe().to_string())
        }
    };

    match merged {
        Ok(detail) => {
            transaction.commit();
            Ok(MergedFile {
                file,
                detail,
                config_backup,
            })
        }
        Err(e) => {
            error!("Merge of {} failed: {e}", file.path());
            Err(abandon_merge(&mut transaction, e))
        }
    }
}

/// Roll back a failed merge and hand back its cause
///
/// A rollback failure is only logged; `cause` stays the reported error.
fn abandon_merge(transaction: &mut MergeTransaction, cause: HandoffError) -> HandoffError {
    if let Err(e) = transaction.rollback() {
        error!("Could not undo the failed merge: {e}");
    }
    cause
}

/// Copy `target` to `<target>.bak`, replacing an earlier copy
pub fn create_config_backup(target: &Path) -> Result<PathBuf> {
    let mut name = target.as_os_str().to_owned();
    name.push(".bak");
    let backup = PathBuf::from(name);

    fs::copy(target, &backup).map_err(|e| error::fs::write_error(&backup, &e))?;
    info!("Backed up {} to {}", target.display(), backup.display());
    Ok(backup)
}
