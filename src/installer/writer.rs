//! Direct file writing
//!
//! Writes every non-reserved bundle entry to the target, overwriting whatever
//! is there. Reserved entries are only registered for the merge step. A
//! failed write is recorded and the remaining files are still written.

use std::path::Path;

use tracing::{debug, error, warn};

use crate::bundle::{FileBundle, ReservedFile};
use crate::progress::ProgressReporter;
use crate::report::{Issue, Step};

use super::file_ops;

/// Result of the direct write step
#[derive(Debug, Default)]
pub struct WriteSummary {
    /// Bundle paths written to the target
    pub written: Vec<String>,
    /// Reserved files found in the bundle, deferred to merging
    pub registered: Vec<ReservedFile>,
    pub issues: Vec<Issue>,
}

/// Write every non-reserved bundle entry under `target_dir`
pub fn write_all_files(
    target_dir: &Path,
    bundle: &FileBundle,
    progress: &mut dyn ProgressReporter,
) -> WriteSummary {
    let mut summary = WriteSummary::default();
    progress.init_file_progress(bundle.len() as u64);

    for (path, content) in bundle.iter() {
        progress.update_file(path);

        if let Some(reserved) = ReservedFile::from_path(path) {
            debug!("Registered {path} for merging");
            summary.registered.push(reserved);
            continue;
        }

        match file_ops::write_file(&target_dir.join(path), content) {
            Ok(()) => {
                debug!("Created {path}");
                summary.written.push(path.to_string());
            }
            Err(e) => {
                error!("Failed to write {path}: {e}");
                summary
                    .issues
                    .push(Issue::error(Step::Write, path, e.to_string()));
            }
        }
    }

    progress.finish_files();

    for reserved in ReservedFile::ALL {
        if !summary.registered.contains(&reserved) {
            warn!(
                "{} not included in the installation bundle",
                reserved.path()
            );
        }
    }

    summary
}
