//! Basic file operations for bundle installation

use std::fs;
use std::path::Path;

use crate::error::{self, Result};

/// Ensure parent directory exists for a path
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| error::fs::write_error(parent, &e))?;
    }
    Ok(())
}

/// Ensure `path` is a directory, returning whether it had to be created
pub fn ensure_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path).map_err(|e| error::fs::write_error(path, &e))?;
    Ok(true)
}

/// Write `content` to `path`, creating missing parent directories
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, content).map_err(|e| error::fs::write_error(path, &e))
}
