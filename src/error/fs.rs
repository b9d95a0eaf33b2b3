//! File system errors

use std::path::Path;

use super::HandoffError;

/// Creates a file not found error
pub fn not_found(path: impl Into<String>) -> HandoffError {
    HandoffError::FileNotFound { path: path.into() }
}

/// Creates a file read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> HandoffError {
    HandoffError::FileReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> HandoffError {
    HandoffError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Maps an IO error raised while reading `path`
pub fn read_error(path: &Path, err: &std::io::Error) -> HandoffError {
    if err.kind() == std::io::ErrorKind::NotFound {
        return not_found(path.display().to_string());
    }
    read_failed(path.display().to_string(), err.to_string())
}

/// Maps an IO error raised while writing `path`
pub fn write_error(path: &Path, err: &std::io::Error) -> HandoffError {
    write_failed(path.display().to_string(), err.to_string())
}
