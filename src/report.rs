//! Installation report
//!
//! Every install run produces an [`InstallReport`]: what was written, merged
//! and backed up, plus every problem met on the way. The report is rendered
//! once for the user and never parsed back.

use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

use console::Style;

use crate::backup::BackupRecord;
use crate::bundle::ReservedFile;
use crate::config::InstallConfig;

const BANNER_WIDTH: usize = 50;

/// Install step an issue was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Backup,
    Write,
    Layout,
    Merge,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Backup => "backup",
            Step::Write => "write",
            Step::Layout => "layout",
            Step::Merge => "merge",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The step degraded but the install result is still usable
    Warning,
    /// Part of the bundle did not make it to the target
    Error,
}

/// A single problem recorded during an install run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub step: Step,
    pub severity: Severity,
    /// Path or component the issue concerns
    pub subject: String,
    pub message: String,
}

impl Issue {
    pub fn warning(step: Step, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step,
            severity: Severity::Warning,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn error(step: Step, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step,
            severity: Severity::Error,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// A reserved config file that went through a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedFile {
    pub file: ReservedFile,
    /// One line describing what the merge did
    pub detail: String,
    /// Persistent `.bak` copy taken before the merge
    pub config_backup: Option<PathBuf>,
}

/// Summary of one install run
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub target_dir: PathBuf,
    pub version: String,
    /// Directory targets declared by the install configuration
    pub directories: Vec<String>,
    /// Bundle paths written directly
    pub written: Vec<String>,
    pub merged: Vec<MergedFile>,
    pub backups: BackupRecord,
    pub next_steps: Vec<String>,
    pub documentation: Vec<String>,
    pub issues: Vec<Issue>,
}

impl InstallReport {
    /// Start an empty report for `target_dir`
    pub fn new(target_dir: &Path, config: &InstallConfig) -> Self {
        Self {
            target_dir: target_dir.to_path_buf(),
            version: config.version.clone(),
            directories: config
                .directories
                .iter()
                .map(|dir| dir.target.clone())
                .collect(),
            written: Vec::new(),
            merged: Vec::new(),
            backups: BackupRecord::new(),
            next_steps: config.next_steps.clone(),
            documentation: config.documentation.clone(),
            issues: Vec::new(),
        }
    }

    /// True when no error-level issue was recorded
    pub fn is_success(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
    }

    /// Render the report as terminal text
    pub fn render(&self) -> String {
        let heading = Style::new().bold().green();
        let mut out = String::new();

        let title = if self.is_success() {
            "Handoff Manager Install Complete"
        } else {
            "Handoff Manager Completed With Errors"
        };
        out.push_str(&banner(title));
        out.push('\n');

        if self.is_success() {
            let _ = writeln!(
                out,
                "The Handoff Manager (v{}) has been installed to {}",
                self.version,
                self.target_dir.display()
            );
        } else {
            let _ = writeln!(
                out,
                "The Handoff Manager (v{}) was only partially installed to {}",
                self.version,
                self.target_dir.display()
            );
        }

        out.push('\n');
        let _ = writeln!(out, "{}", heading.apply_to("Files installed:"));
        for merged in &self.merged {
            let label = match merged.file {
                ReservedFile::ModeRegistry => "Custom mode in",
                ReservedFile::Rules => "Handoff rules in",
            };
            let _ = writeln!(out, "- {label} {} ({})", merged.file.path(), merged.detail);
        }
        let _ = writeln!(out, "- {} bundled file(s)", self.written.len());
        for dir in &self.directories {
            if self.write_failed_under(dir) {
                let _ = writeln!(out, "- {dir} (incomplete)");
            } else if self.written.iter().any(|path| is_under(path, dir)) {
                let _ = writeln!(out, "- {dir}");
            }
        }

        if !self.backups.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "{}", heading.apply_to("Backup created:"));
            for (component, path) in &self.backups {
                let _ = writeln!(out, "- Previous {component} preserved in {}", path.display());
            }
        }

        let config_backups: Vec<&PathBuf> = self
            .merged
            .iter()
            .filter_map(|merged| merged.config_backup.as_ref())
            .collect();
        if !config_backups.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "{}", heading.apply_to("Configuration backups:"));
            for path in config_backups {
                let _ = writeln!(out, "- {}", path.display());
            }
        }

        if !self.issues.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "{}", Style::new().bold().yellow().apply_to("Problems:"));
            for issue in &self.issues {
                let severity = match issue.severity {
                    Severity::Warning => Style::new().yellow().apply_to("warning"),
                    Severity::Error => Style::new().red().apply_to("error"),
                };
                let _ = writeln!(
                    out,
                    "- [{severity}] {} {}: {}",
                    issue.step, issue.subject, issue.message
                );
            }
        }

        if !self.next_steps.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "{}", heading.apply_to("Next Steps:"));
            for step in &self.next_steps {
                let _ = writeln!(out, "{step}");
            }
        }

        if !self.documentation.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "{}", heading.apply_to("For documentation, see:"));
            for doc in &self.documentation {
                let _ = writeln!(out, "- {doc}");
            }
        }

        out
    }

    fn write_failed_under(&self, dir: &str) -> bool {
        self.errors()
            .any(|issue| issue.step == Step::Write && is_under(&issue.subject, dir))
    }

    /// Print the rendered report to stdout
    pub fn print(&self) {
        print!("{}", self.render());
    }
}

/// Whether bundle path `path` lies inside directory target `dir`
fn is_under(path: &str, dir: &str) -> bool {
    path.strip_prefix(dir.trim_end_matches('/'))
        .is_some_and(|rest| rest.starts_with('/'))
}

fn banner(title: &str) -> String {
    let inner = BANNER_WIDTH;
    let len = title.chars().count().min(inner);
    let left = (inner - len) / 2;
    let right = inner - len - left;
    let rule = "═".repeat(inner);
    let blank = " ".repeat(inner);

    format!(
        "╔{rule}╗\n║{blank}║\n║{}{title}{}║\n║{blank}║\n╚{rule}╝\n",
        " ".repeat(left),
        " ".repeat(right)
    )
}
