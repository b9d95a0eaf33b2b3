//! Rules document merge
//!
//! The rules document is free text. The incoming rules are appended once,
//! separated from existing content by a blank line. A document that already
//! mentions [`RULES_MARKER`] is considered installed and left alone.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{self, Result};

/// Marker text identifying installed handoff rules
pub const RULES_MARKER: &str = "Handoff System Rules";

/// What a rules merge did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesMergeOutcome {
    /// The existing document already carried the rules; nothing was written
    AlreadyPresent,
    /// The incoming rules were appended and written to the output
    Appended,
}

impl RulesMergeOutcome {
    pub fn describe(self) -> &'static str {
        match self {
            RulesMergeOutcome::AlreadyPresent => "rules already present",
            RulesMergeOutcome::Appended => "rules appended",
        }
    }
}

/// Append the incoming rules to the existing document
///
/// A missing incoming file fails the merge. Nothing is written when the
/// existing document already contains [`RULES_MARKER`].
pub fn merge_rules_document(
    existing: Option<&Path>,
    incoming: &Path,
    output: &Path,
) -> Result<RulesMergeOutcome> {
    let base = match existing.filter(|path| path.exists()) {
        Some(path) => {
            let content =
                fs::read_to_string(path).map_err(|e| error::fs::read_error(path, &e))?;
            if content.contains(RULES_MARKER) {
                info!("Handoff rules already present in {}", path.display());
                return Ok(RulesMergeOutcome::AlreadyPresent);
            }
            content
        }
        None => {
            debug!("No existing rules document, starting empty");
            String::new()
        }
    };

    if !incoming.exists() {
        return Err(error::merge::incoming_missing(
            "rules",
            incoming.display().to_string(),
        ));
    }
    let addition =
        fs::read_to_string(incoming).map_err(|e| error::fs::read_error(incoming, &e))?;
    if !addition.contains(RULES_MARKER) {
        warn!(
            "Incoming rules do not mention '{RULES_MARKER}'; they will be appended again on the next install"
        );
    }

    fs::write(output, append_rules(&base, &addition))
        .map_err(|e| error::fs::write_error(output, &e))?;
    info!("Appended handoff rules to {}", output.display());

    Ok(RulesMergeOutcome::Appended)
}

/// Join `base` and `addition` with exactly one blank line between them
///
/// Trailing line breaks already on `base` count toward the blank line. The
/// separator follows `base`'s line ending style.
pub fn append_rules(base: &str, addition: &str) -> String {
    if base.is_empty() {
        return addition.to_string();
    }

    let newline = if base.contains("\r\n") { "\r\n" } else { "\n" };
    let mut merged = String::with_capacity(base.len() + addition.len() + 2 * newline.len());
    merged.push_str(base);
    for _ in trailing_line_breaks(base)..2 {
        merged.push_str(newline);
    }
    merged.push_str(addition);
    merged
}

/// Count trailing line breaks, up to two
fn trailing_line_breaks(text: &str) -> usize {
    let mut rest = text;
    let mut count = 0;
    while count < 2 {
        if let Some(stripped) = rest.strip_suffix("\r\n") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_suffix('\n') {
            rest = stripped;
        } else {
            break;
        }
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandoffError;
    use tempfile::TempDir;

    const INCOMING: &str = "# Handoff System Rules\n- keep handoffs tidy\n";

    #[test]
    fn test_append_rules_separator() {
        assert_eq!(append_rules("rules", "NEW"), "rules\n\nNEW");
        assert_eq!(append_rules("rules\n", "NEW"), "rules\n\nNEW");
        assert_eq!(append_rules("rules\n\n", "NEW"), "rules\n\nNEW");
        assert_eq!(append_rules("rules\n\n\n", "NEW"), "rules\n\n\nNEW");
        assert_eq!(append_rules("", "NEW"), "NEW");
    }

    #[test]
    fn test_append_rules_keeps_crlf() {
        assert_eq!(append_rules("a\r\nb", "NEW"), "a\r\nb\r\n\r\nNEW");
        assert_eq!(append_rules("a\r\nb\r\n", "NEW"), "a\r\nb\r\n\r\nNEW");
    }

    #[test]
    fn test_merge_appends_to_existing() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join(".clinerules");
        let incoming = temp.path().join(".clinerules.new");
        fs::write(&existing, "# My rules\n- be nice").unwrap();
        fs::write(&incoming, INCOMING).unwrap();

        let outcome = merge_rules_document(Some(&existing), &incoming, &existing).unwrap();

        assert_eq!(outcome, RulesMergeOutcome::Appended);
        assert_eq!(
            fs::read_to_string(&existing).unwrap(),
            format!("# My rules\n- be nice\n\n{INCOMING}")
        );
    }

    #[test]
    fn test_merge_skips_when_marker_present() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join(".clinerules");
        let incoming = temp.path().join(".clinerules.new");
        let original = "# Mine\n\n# Handoff System Rules\nold copy\n";
        fs::write(&existing, original).unwrap();
        fs::write(&incoming, INCOMING).unwrap();

        let outcome = merge_rules_document(Some(&existing), &incoming, &existing).unwrap();

        assert_eq!(outcome, RulesMergeOutcome::AlreadyPresent);
        assert_eq!(fs::read_to_string(&existing).unwrap(), original);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join(".clinerules");
        let incoming = temp.path().join(".clinerules.new");
        fs::write(&existing, "# Mine\n").unwrap();
        fs::write(&incoming, INCOMING).unwrap();

        merge_rules_document(Some(&existing), &incoming, &existing).unwrap();
        let first = fs::read_to_string(&existing).unwrap();
        let outcome = merge_rules_document(Some(&existing), &incoming, &existing).unwrap();

        assert_eq!(outcome, RulesMergeOutcome::AlreadyPresent);
        assert_eq!(fs::read_to_string(&existing).unwrap(), first);
    }

    #[test]
    fn test_merge_without_existing_writes_incoming() {
        let temp = TempDir::new().unwrap();
        let incoming = temp.path().join(".clinerules.new");
        let output = temp.path().join(".clinerules");
        fs::write(&incoming, INCOMING).unwrap();

        merge_rules_document(Some(&output), &incoming, &output).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), INCOMING);
    }

    #[test]
    fn test_merge_into_empty_existing_has_no_leading_blank_line() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join(".clinerules");
        let incoming = temp.path().join(".clinerules.new");
        fs::write(&existing, "").unwrap();
        fs::write(&incoming, INCOMING).unwrap();

        let outcome = merge_rules_document(Some(&existing), &incoming, &existing).unwrap();

        assert_eq!(outcome, RulesMergeOutcome::Appended);
        assert_eq!(fs::read_to_string(&existing).unwrap(), INCOMING);
    }

    #[test]
    fn test_merge_fails_when_incoming_missing() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join(".clinerules");
        fs::write(&existing, "# Mine").unwrap();

        let result = merge_rules_document(
            Some(&existing),
            &temp.path().join("missing.new"),
            &existing,
        );

        assert!(matches!(result, Err(HandoffError::IncomingMissing { .. })));
        assert_eq!(fs::read_to_string(&existing).unwrap(), "# Mine");
    }

    #[test]
    fn test_merge_to_separate_output() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join(".clinerules");
        let incoming = temp.path().join(".clinerules.new");
        let output = temp.path().join("merged");
        fs::write(&existing, "# Mine").unwrap();
        fs::write(&incoming, INCOMING).unwrap();

        merge_rules_document(Some(&existing), &incoming, &output).unwrap();

        assert_eq!(fs::read_to_string(&existing).unwrap(), "# Mine");
        assert!(fs::read_to_string(&output).unwrap().ends_with(INCOMING));
    }
}
