//! Install configuration
//!
//! The configuration mirrors the object the publisher embeds next to the
//! bundled files: install options that drive control flow, plus descriptive
//! metadata (`directories`, `nextSteps`, `documentation`) that only feeds the
//! final report.
//!
//! Configuration files may be JSON or YAML; the format is picked from the
//! file extension (`.yaml` / `.yml` for YAML, anything else is JSON).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{self, Result};

/// Default upper bound for a single bundled file (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Full configuration for one installation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstallConfig {
    /// Version string shown in the report
    pub version: String,

    /// Directory mappings the bundle was assembled from
    pub directories: Vec<DirectoryMapping>,

    /// Options controlling which install steps run
    pub install_options: InstallOptions,

    /// Instructions printed after a successful install
    pub next_steps: Vec<String>,

    /// Documentation references printed after a successful install
    pub documentation: Vec<String>,

    /// Files larger than this are skipped when loading a bundle from disk
    pub max_file_size: u64,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            directories: Vec::new(),
            install_options: InstallOptions::default(),
            next_steps: Vec::new(),
            documentation: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// A source directory and the location it is installed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMapping {
    pub source: String,
    pub target: String,
}

/// Switches for the optional install steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstallOptions {
    /// Deep-copy an existing `handoffs/` directory before installing
    pub create_backups: bool,

    /// Merge the bundled `.roomodes` into the target's
    pub merge_roomodes: bool,

    /// Merge the bundled `.clinerules` into the target's
    pub merge_clinerules: bool,

    /// Keep a `<file>.bak` copy of each reserved file before merging it
    pub backup_config_files: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            create_backups: true,
            merge_roomodes: true,
            merge_clinerules: true,
            backup_config_files: true,
        }
    }
}

impl InstallConfig {
    /// Load configuration from a JSON or YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();

        if !path.is_file() {
            return Err(error::config::not_found(display));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| error::config::read_failed(&display, e.to_string()))?;

        Self::from_str_for_path(&content, path)
    }

    /// Parse configuration content, choosing the format from `path`'s extension
    pub fn from_str_for_path(content: &str, path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            serde_yaml::from_str(content)
                .map_err(|e| error::config::parse_failed(display, e.to_string()))
        } else {
            serde_json::from_str(content)
                .map_err(|e| error::config::parse_failed(display, e.to_string()))
        }
    }
}
