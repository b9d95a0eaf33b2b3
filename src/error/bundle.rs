//! Bundle-related errors

use super::HandoffError;

/// Creates a bundle directory not found error
pub fn not_found(path: impl Into<String>) -> HandoffError {
    HandoffError::BundleNotFound { path: path.into() }
}

/// Creates an invalid bundle path error
pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> HandoffError {
    HandoffError::InvalidBundlePath {
        path: path.into(),
        reason: reason.into(),
    }
}
