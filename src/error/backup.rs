//! Backup errors

use super::HandoffError;

/// Creates a backup copy failed error
pub fn copy_failed(
    component: impl Into<String>,
    path: impl Into<String>,
    reason: impl Into<String>,
) -> HandoffError {
    HandoffError::BackupFailed {
        component: component.into(),
        path: path.into(),
        reason: reason.into(),
    }
}
