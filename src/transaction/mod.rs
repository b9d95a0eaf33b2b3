//! Transactional merge of a reserved config file
//!
//! A [`MergeTransaction`] stages the incoming content in a temporary sibling of
//! the target file and snapshots the target's current content. If the
//! transaction is dropped without [`MergeTransaction::commit`], the target is
//! restored from the snapshot (or removed when it did not exist before). The
//! staging and snapshot files never outlive the transaction.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = MergeTransaction::begin(&target, incoming_content)?;
//! merge(transaction.existing(), transaction.incoming_path(), &target)?;
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // rollback happens automatically
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info, warn};

use crate::error::{self, Result};

/// A merge of one file that is either committed or undone
#[derive(Debug)]
pub struct MergeTransaction {
    /// File the merge writes to
    target: PathBuf,

    /// Incoming content staged next to the target
    incoming: NamedTempFile,

    /// Copy of the target taken before the merge
    snapshot: Option<NamedTempFile>,

    /// Whether the transaction has been committed or rolled back
    finished: bool,
}

impl MergeTransaction {
    /// Stage `incoming_content` and snapshot `target`
    ///
    /// The target's parent directory must exist.
    pub fn begin(target: &Path, incoming_content: &str) -> Result<Self> {
        let dir = target
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let prefix = format!(
            "{}.",
            target
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        );

        let mut incoming = Builder::new()
            .prefix(&prefix)
            .suffix(".new")
            .tempfile_in(dir)
            .map_err(|e| error::fs::write_error(dir, &e))?;
        incoming
            .write_all(incoming_content.as_bytes())
            .and_then(|()| incoming.flush())
            .map_err(|e| error::fs::write_error(incoming.path(), &e))?;

        let snapshot = if target.exists() {
            let snapshot = Builder::new()
                .prefix(&prefix)
                .suffix(".temp")
                .tempfile_in(dir)
                .map_err(|e| error::fs::write_error(dir, &e))?;
            fs::copy(target, snapshot.path()).map_err(|e| error::fs::read_error(target, &e))?;
            debug!("Snapshot of {} taken", target.display());
            Some(snapshot)
        } else {
            None
        };

        Ok(Self {
            target: target.to_path_buf(),
            incoming,
            snapshot,
            finished: false,
        })
    }

    /// Path of the staged incoming content
    pub fn incoming_path(&self) -> &Path {
        self.incoming.path()
    }

    /// The target path, when it existed as the transaction began
    pub fn existing(&self) -> Option<&Path> {
        self.snapshot.as_ref().map(|_| self.target.as_path())
    }

    /// Keep the merged result
    pub fn commit(mut self) {
        self.finished = true;
        debug!("Merge of {} committed", self.target.display());
    }

    /// Undo any change made to the target since [`Self::begin`]
    pub fn rollback(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        match &self.snapshot {
            Some(snapshot) => {
                fs::copy(snapshot.path(), &self.target)
                    .map_err(|e| error::fs::write_error(&self.target, &e))?;
                info!("Restored {} from snapshot", self.target.display());
            }
            None => {
                if self.target.exists() {
                    fs::remove_file(&self.target)
                        .map_err(|e| error::fs::write_error(&self.target, &e))?;
                    info!("Removed partially merged {}", self.target.display());
                }
            }
        }

        Ok(())
    }
}

impl Drop for MergeTransaction {
    fn drop(&mut self) {
        if let Err(e) = self.rollback() {
            warn!("Rollback failed: {e}");
        }
    }
}
