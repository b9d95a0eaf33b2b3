//! Custom mode registry merge
//!
//! The registry is a JSON object whose `customModes` array holds mode records.
//! Records are kept as opaque JSON values; only their `slug` is inspected.
//! The merge keeps every existing record except the reserved one, then appends
//! the reserved record from the incoming registry.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{self, Result};

/// Slug owned by the installer
pub const RESERVED_SLUG: &str = "handoff-manager";

const MODES_KEY: &str = "customModes";

/// Ordered list of custom mode records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeRegistry {
    modes: Vec<Value>,
}

impl ModeRegistry {
    /// Parse a registry document
    ///
    /// Fails when the content is not JSON or has no `customModes` array.
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_from(content, "mode registry")
    }

    /// Parse a registry document, naming `source` in errors
    pub fn parse_from(content: &str, source: impl fmt::Display) -> Result<Self> {
        let document: Value = serde_json::from_str(content)
            .map_err(|e| error::merge::invalid_registry(source.to_string(), e.to_string()))?;
        match document.get(MODES_KEY) {
            Some(Value::Array(modes)) => Ok(Self {
                modes: modes.clone(),
            }),
            Some(_) => Err(error::merge::invalid_registry(
                source.to_string(),
                format!("\"{MODES_KEY}\" is not an array"),
            )),
            None => Err(error::merge::invalid_registry(
                source.to_string(),
                format!("missing \"{MODES_KEY}\" array"),
            )),
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn modes(&self) -> &[Value] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Drop every record carrying `slug`
    pub fn remove_slug(&mut self, slug: &str) -> usize {
        let before = self.modes.len();
        self.modes.retain(|mode| !has_slug(mode, slug));
        before - self.modes.len()
    }

    /// First record carrying `slug`
    pub fn find_slug(&self, slug: &str) -> Option<&Value> {
        self.modes.iter().find(|mode| has_slug(mode, slug))
    }

    pub fn push(&mut self, mode: Value) {
        self.modes.push(mode);
    }

    /// Pretty-printed JSON with two-space indentation
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut document = Map::new();
        document.insert(MODES_KEY.to_string(), Value::Array(self.modes.clone()));
        serde_json::to_string_pretty(&Value::Object(document))
    }
}

fn has_slug(mode: &Value, slug: &str) -> bool {
    mode.get("slug").and_then(Value::as_str) == Some(slug)
}

/// What a mode registry merge did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeMergeOutcome {
    /// Existing records carried over
    pub preserved: usize,
    /// Stale reserved records replaced
    pub replaced: usize,
    /// Whether the incoming registry supplied a reserved record
    pub reserved_added: bool,
    /// Whether an unreadable existing registry was ignored
    pub existing_discarded: bool,
}

impl ModeMergeOutcome {
    /// One line summary for the install report
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("kept {} existing mode(s)", self.preserved)];
        if self.reserved_added && self.replaced > 0 {
            parts.push(format!("updated '{RESERVED_SLUG}'"));
        } else if self.reserved_added {
            parts.push(format!("installed '{RESERVED_SLUG}'"));
        } else {
            parts.push(format!("no '{RESERVED_SLUG}' mode in bundle"));
        }
        if self.existing_discarded {
            parts.push("unreadable existing registry replaced".to_string());
        }
        parts.join(", ")
    }
}

/// Merge the incoming mode registry into the existing one
///
/// An existing registry that cannot be read or parsed is treated as empty.
/// A missing or malformed incoming registry fails the merge and `output` is
/// left untouched.
pub fn merge_mode_registry(
    existing: Option<&Path>,
    incoming: &Path,
    output: &Path,
) -> Result<ModeMergeOutcome> {
    let mut outcome = ModeMergeOutcome {
        preserved: 0,
        replaced: 0,
        reserved_added: false,
        existing_discarded: false,
    };

    let mut merged = match existing.filter(|path| path.exists()) {
        Some(path) => match read_registry(path) {
            Ok(mut registry) => {
                outcome.replaced = registry.remove_slug(RESERVED_SLUG);
                outcome.preserved = registry.len();
                info!("Preserving {} existing custom mode(s)", outcome.preserved);
                registry
            }
            Err(e) => {
                warn!("Ignoring unreadable mode registry {}: {e}", path.display());
                outcome.existing_discarded = true;
                ModeRegistry::default()
            }
        },
        None => {
            debug!("No existing mode registry, starting empty");
            ModeRegistry::default()
        }
    };

    if !incoming.exists() {
        return Err(error::merge::incoming_missing(
            "mode registry",
            incoming.display().to_string(),
        ));
    }
    let incoming_registry = read_registry(incoming)?;

    match incoming_registry.find_slug(RESERVED_SLUG) {
        Some(mode) => {
            merged.push(mode.clone());
            outcome.reserved_added = true;
            info!("Added '{RESERVED_SLUG}' custom mode");
        }
        None => warn!(
            "No '{RESERVED_SLUG}' mode found in {}",
            incoming.display()
        ),
    }

    let content = merged
        .to_json_pretty()
        .map_err(|e| error::fs::write_error(output, &io::Error::from(e)))?;
    fs::write(output, content).map_err(|e| error::fs::write_error(output, &e))?;

    Ok(outcome)
}

fn read_registry(path: &Path) -> Result<ModeRegistry> {
    let content = fs::read_to_string(path).map_err(|e| error::fs::read_error(path, &e))?;
    ModeRegistry::parse_from(&content, path.display())
}
