//! Command implementations for the handoff installer CLI

pub mod completions;
pub mod install;
pub mod version;
