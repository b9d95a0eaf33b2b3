//! Reserved config file merge errors

use super::HandoffError;

/// Creates an invalid mode registry error
pub fn invalid_registry(path: impl Into<String>, reason: impl Into<String>) -> HandoffError {
    HandoffError::InvalidModeRegistry {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an incoming file missing error
pub fn incoming_missing(kind: impl Into<String>, path: impl Into<String>) -> HandoffError {
    HandoffError::IncomingMissing {
        kind: kind.into(),
        path: path.into(),
    }
}
