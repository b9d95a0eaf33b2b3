//! Merging of reserved config files
//!
//! Both merges read an optional existing file and an incoming file, and write
//! the merged result to an output path. The output may be the same path as the
//! existing file. Nothing is written when a merge returns an error.

pub mod modes;
pub mod rules;

pub use modes::{ModeMergeOutcome, ModeRegistry, RESERVED_SLUG, merge_mode_registry};
pub use rules::{RULES_MARKER, RulesMergeOutcome, append_rules, merge_rules_document};
