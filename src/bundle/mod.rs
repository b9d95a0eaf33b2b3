//! File bundles
//!
//! A [`FileBundle`] maps normalized relative paths (forward slashes, no
//! leading `/`, no `..`) to the text content that should land at that path
//! under the install target. It is built once per run and only read during
//! installation.
//!
//! Two paths are reserved: they are never written directly but merged with
//! whatever already exists at the target (see [`ReservedFile`]).

use std::collections::BTreeMap;
use std::path::{Component, Path};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{self, Result};

/// Path of the custom mode registry inside a bundle and a target
pub const MODE_REGISTRY_PATH: &str = ".roomodes";

/// Path of the rules document inside a bundle and a target
pub const RULES_PATH: &str = ".clinerules";

/// Config files that bypass direct overwrite and go through a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReservedFile {
    /// JSON custom mode registry (`.roomodes`)
    ModeRegistry,
    /// Plain-text rules document (`.clinerules`)
    Rules,
}

impl ReservedFile {
    /// Every reserved file, in merge order
    pub const ALL: [ReservedFile; 2] = [ReservedFile::ModeRegistry, ReservedFile::Rules];

    /// Bundle-relative path of this file
    pub fn path(self) -> &'static str {
        match self {
            ReservedFile::ModeRegistry => MODE_REGISTRY_PATH,
            ReservedFile::Rules => RULES_PATH,
        }
    }

    /// Look up the reserved file for a normalized bundle path
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|reserved| reserved.path() == path)
    }

    /// Human readable name used in logs and the report
    pub fn label(self) -> &'static str {
        match self {
            ReservedFile::ModeRegistry => "mode registry",
            ReservedFile::Rules => "rules",
        }
    }
}

/// Immutable mapping of relative path to file content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBundle {
    files: BTreeMap<String, String>,
}

impl FileBundle {
    /// Build a bundle from `(path, content)` pairs, normalizing every path
    #[allow(dead_code)] // Used in tests
    pub fn from_entries<I, P, C>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        let mut files = BTreeMap::new();
        for (path, content) in entries {
            files.insert(normalize_path(path.as_ref())?, content.into());
        }
        Ok(Self { files })
    }

    /// Load every file under `root` into a bundle
    ///
    /// Files larger than `max_file_size` bytes are skipped, as are files whose
    /// content is not valid UTF-8.
    pub fn from_dir(root: &Path, max_file_size: u64) -> Result<Self> {
        if !root.is_dir() {
            return Err(error::bundle::not_found(root.display().to_string()));
        }

        let mut files = BTreeMap::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry
                .map_err(|e| error::fs::read_failed(root.display().to_string(), e.to_string()))?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| error::bundle::invalid_path(entry.path().display().to_string(), e.to_string()))?;
            let relative = relative_to_bundle_path(relative)?;

            let size = entry
                .metadata()
                .map_err(|e| error::fs::read_failed(entry.path().display().to_string(), e.to_string()))?
                .len();
            if size > max_file_size {
                info!(
                    "skipping {relative}: {size} bytes exceeds the {max_file_size} byte limit"
                );
                continue;
            }

            match std::fs::read_to_string(entry.path()) {
                Ok(content) => {
                    debug!("bundled {relative}");
                    files.insert(relative, content);
                }
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    warn!("skipping {relative}: content is not valid UTF-8");
                }
                Err(e) => return Err(error::fs::read_error(entry.path(), &e)),
            }
        }

        Ok(Self { files })
    }

    /// Content stored at `path`, if any
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Iterate `(path, content)` pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Normalize a bundle path to forward slashes with no leading `/` or `./`
///
/// Rejects absolute paths and `..` segments so no bundle entry can resolve
/// outside the install target.
pub fn normalize_path(raw: &str) -> Result<String> {
    let unified = raw.replace('\\', "/");

    if unified.starts_with('/') {
        return Err(error::bundle::invalid_path(raw, "absolute paths are not allowed"));
    }

    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(error::bundle::invalid_path(
                    raw,
                    "parent directory segments are not allowed",
                ));
            }
            s if s.contains(':') => {
                return Err(error::bundle::invalid_path(raw, "drive prefixes are not allowed"));
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Err(error::bundle::invalid_path(raw, "path is empty"));
    }

    Ok(segments.join("/"))
}

fn relative_to_bundle_path(relative: &Path) -> Result<String> {
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => {
                return Err(error::bundle::invalid_path(
                    relative.display().to_string(),
                    "unexpected path component",
                ));
            }
        }
    }
    normalize_path(&segments.join("/"))
}
