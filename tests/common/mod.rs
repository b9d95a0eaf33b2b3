//! Common test utilities for handoff installer integration tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A test workspace holding a bundle and an install target
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Absolute path of a workspace entry
    pub fn join(&self, path: &str) -> PathBuf {
        self.path.join(path)
    }

    /// Copy a fixture bundle into `bundles/<target_name>`
    pub fn copy_fixture_bundle(&self, fixture_name: &str, target_name: &str) -> PathBuf {
        let target_path = self.path.join("bundles").join(target_name);
        copy_dir_recursive(&fixture_dir("bundles").join(fixture_name), &target_path)
            .expect("Failed to copy fixture bundle");
        target_path
    }

    /// Copy a fixture config file into the workspace root
    pub fn copy_fixture_config(&self, fixture_name: &str) -> PathBuf {
        let target_path = self.path.join(fixture_name);
        std::fs::copy(fixture_dir("configs").join(fixture_name), &target_path)
            .expect("Failed to copy fixture config");
        target_path
    }

    /// Names of `.new` / `.temp` staging files left in `dir`
    pub fn staging_leftovers(&self, dir: &str) -> Vec<String> {
        std::fs::read_dir(self.path.join(dir))
            .expect("Failed to read directory")
            .map(|entry| {
                entry
                    .expect("Failed to read entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .filter(|name| name.ends_with(".new") || name.ends_with(".temp"))
            .collect()
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

fn fixture_dir(kind: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("common")
        .join("fixtures")
        .join(kind)
}

/// Recursively copy a directory
fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    if !dst.exists() {
        std::fs::create_dir_all(dst)?;
    }

    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("test/file.txt", "hello");
        assert!(workspace.file_exists("test/file.txt"));
        assert_eq!(workspace.read_file("test/file.txt"), "hello");
    }

    #[test]
    fn test_workspace_copy_fixture_bundle() {
        let workspace = TestWorkspace::new();
        workspace.copy_fixture_bundle("handoff-manager", "dist");

        assert!(workspace.file_exists("bundles/dist/.roomodes"));
        assert!(workspace.file_exists("bundles/dist/handoffs/0-instructions/0-intro.md"));
    }
}
