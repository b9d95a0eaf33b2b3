//! Installation of a file bundle into a target directory
//!
//! This module handles:
//! - Backing up a previous installation
//! - Writing bundle files directly (see [`writer`])
//! - Ensuring the `handoffs/` layout exists
//! - Merging the reserved config files (see [`reserved`])
//!
//! [`Installer::install`] never returns an error. Every problem is recorded
//! in the [`InstallReport`] and the remaining steps still run.

pub mod file_ops;
pub mod reserved;
pub mod writer;

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::backup::{self, HANDOFFS_DIR};
use crate::bundle::{FileBundle, ReservedFile};
use crate::config::InstallConfig;
use crate::progress::ProgressReporter;
use crate::report::{InstallReport, Issue, Step};

/// Installs a bundle according to an [`InstallConfig`]
pub struct Installer<'a> {
    config: &'a InstallConfig,
    progress: Box<dyn ProgressReporter + 'a>,
}

impl<'a> Installer<'a> {
    pub fn new(config: &'a InstallConfig, progress: Box<dyn ProgressReporter + 'a>) -> Self {
        Self { config, progress }
    }

    /// Run every install step against `target_dir`
    pub fn install(&mut self, target_dir: &Path, bundle: &FileBundle) -> InstallReport {
        let options = self.config.install_options;
        let mut report = InstallReport::new(target_dir, self.config);

        info!(
            "Installing Handoff Manager v{} into {}",
            self.config.version,
            target_dir.display()
        );

        // Backup
        if options.create_backups {
            let outcome = backup::backup_existing_installation(target_dir);
            report.backups = outcome.record;
            report.issues.extend(outcome.issues);
        } else {
            debug!("Backups disabled");
        }

        // Write
        let summary = writer::write_all_files(target_dir, bundle, self.progress.as_mut());
        report.written = summary.written;
        report.issues.extend(summary.issues);

        // Ensure layout
        let handoffs = target_dir.join(HANDOFFS_DIR);
        match file_ops::ensure_dir(&handoffs) {
            Ok(true) => info!("Created {}", handoffs.display()),
            Ok(false) => debug!("{} already exists", handoffs.display()),
            Err(e) => {
                warn!("Could not create {}: {e}", handoffs.display());
                report
                    .issues
                    .push(Issue::warning(Step::Layout, HANDOFFS_DIR, e.to_string()));
            }
        }

        // Merge configs
        for file in ReservedFile::ALL {
            if !self.merge_enabled(file) {
                debug!("Merging of {} disabled", file.path());
                continue;
            }

            match reserved::merge_reserved_file(
                target_dir,
                file,
                bundle,
                options.backup_config_files,
                &mut report.issues,
            ) {
                Ok(merged) => report.merged.push(merged),
                Err(e) => {
                    error!("Could not merge {}: {e}", file.path());
                    report
                        .issues
                        .push(Issue::error(Step::Merge, file.path(), e.to_string()));
                }
            }
        }

        if report.is_success() {
            info!(
                "Installation complete with {} warning(s)",
                report.warnings().count()
            );
        } else {
            warn!(
                "Installation finished with {} error(s)",
                report.errors().count()
            );
        }

        report
    }

    fn merge_enabled(&self, file: ReservedFile) -> bool {
        match file {
            ReservedFile::ModeRegistry => self.config.install_options.merge_roomodes,
            ReservedFile::Rules => self.config.install_options.merge_clinerules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::ModeRegistry;
    use crate::progress::SilentProgressReporter;
    use crate::report::Severity;
    use std::fs;
    use tempfile::TempDir;

    const BUNDLED_MODES: &str =
        r#"{"customModes":[{"slug":"handoff-manager","name":"Handoff Manager"}]}"#;
    const BUNDLED_RULES: &str = "# Handoff System Rules\n- keep it tidy\n";

    fn bundle() -> FileBundle {
        FileBundle::from_entries([
            (".roomodes", BUNDLED_MODES),
            (".clinerules", BUNDLED_RULES),
            ("other.md", "other"),
            ("handoffs/0-instructions/0-intro.md", "intro"),
        ])
        .unwrap()
    }

    fn install(config: &InstallConfig, target: &Path, bundle: &FileBundle) -> InstallReport {
        Installer::new(config, Box::new(SilentProgressReporter)).install(target, bundle)
    }

    #[test]
    fn test_fresh_install() {
        let temp = TempDir::new().unwrap();
        let config = InstallConfig::default();

        let report = install(&config, temp.path(), &bundle());

        assert!(report.is_success(), "issues: {:?}", report.issues);
        assert!(report.backups.is_empty());
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.merged.len(), 2);
        assert_eq!(
            fs::read_to_string(temp.path().join("other.md")).unwrap(),
            "other"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join(".clinerules")).unwrap(),
            BUNDLED_RULES
        );
        let modes = ModeRegistry::parse(
            &fs::read_to_string(temp.path().join(".roomodes")).unwrap(),
        )
        .unwrap();
        assert_eq!(modes.len(), 1);
        assert!(temp.path().join("handoffs").is_dir());
    }

    #[test]
    fn test_reinstall_backs_up_and_merges() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("handoffs")).unwrap();
        fs::write(temp.path().join("handoffs/1-work.md"), "my handoff").unwrap();
        fs::write(
            temp.path().join(".roomodes"),
            r#"{"customModes":[{"slug":"a"},{"slug":"handoff-manager","name":"old"}]}"#,
        )
        .unwrap();
        fs::write(temp.path().join(".clinerules"), "# Mine").unwrap();
        let config = InstallConfig::default();

        let report = install(&config, temp.path(), &bundle());

        assert!(report.is_success(), "issues: {:?}", report.issues);
        assert_eq!(
            report.backups.get("handoffs"),
            Some(&temp.path().join("handoffs-backup"))
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("handoffs-backup/1-work.md")).unwrap(),
            "my handoff"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("handoffs/1-work.md")).unwrap(),
            "my handoff"
        );

        let content = fs::read_to_string(temp.path().join(".roomodes")).unwrap();
        let modes = ModeRegistry::parse(&content).unwrap();
        let slugs: Vec<&str> = modes
            .modes()
            .iter()
            .map(|m| m["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, vec!["a", "handoff-manager"]);
        assert_eq!(modes.modes()[1]["name"], "Handoff Manager");

        assert_eq!(
            fs::read_to_string(temp.path().join(".clinerules")).unwrap(),
            format!("# Mine\n\n{BUNDLED_RULES}")
        );
        assert!(temp.path().join(".roomodes.bak").exists());
        assert!(temp.path().join(".clinerules.bak").exists());
    }

    #[test]
    fn test_second_install_is_stable() {
        let temp = TempDir::new().unwrap();
        let config = InstallConfig::default();

        install(&config, temp.path(), &bundle());
        let modes_first = fs::read_to_string(temp.path().join(".roomodes")).unwrap();
        let rules_first = fs::read_to_string(temp.path().join(".clinerules")).unwrap();
        let report = install(&config, temp.path(), &bundle());

        assert!(report.is_success());
        assert_eq!(
            fs::read_to_string(temp.path().join(".roomodes")).unwrap(),
            modes_first
        );
        assert_eq!(
            fs::read_to_string(temp.path().join(".clinerules")).unwrap(),
            rules_first
        );
        assert!(temp.path().join("handoffs-backup").is_dir());
    }

    #[test]
    fn test_disabled_steps_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("handoffs")).unwrap();
        let mut config = InstallConfig::default();
        config.install_options.create_backups = false;
        config.install_options.merge_roomodes = false;
        config.install_options.merge_clinerules = false;

        let report = install(&config, temp.path(), &bundle());

        assert!(report.is_success());
        assert!(report.merged.is_empty());
        assert!(!temp.path().join("handoffs-backup").exists());
        assert!(!temp.path().join(".roomodes").exists());
        assert!(!temp.path().join(".clinerules").exists());
    }

    #[test]
    fn test_failed_mode_merge_does_not_block_rules() {
        let temp = TempDir::new().unwrap();
        let original = r#"{"customModes":[{"slug":"a"}]}"#;
        fs::write(temp.path().join(".roomodes"), original).unwrap();
        let bundle = FileBundle::from_entries([
            (".roomodes", "[not a registry"),
            (".clinerules", BUNDLED_RULES),
        ])
        .unwrap();

        let report = install(&InstallConfig::default(), temp.path(), &bundle);

        assert!(!report.is_success());
        let errors: Vec<&Issue> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].subject, ".roomodes");
        assert_eq!(errors[0].severity, Severity::Error);
        assert_eq!(
            fs::read_to_string(temp.path().join(".roomodes")).unwrap(),
            original
        );
        assert_eq!(
            fs::read_to_string(temp.path().join(".clinerules")).unwrap(),
            BUNDLED_RULES
        );
        let leftovers = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".new") || name.ends_with(".temp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_report_carries_config_metadata() {
        let temp = TempDir::new().unwrap();
        let config = InstallConfig {
            version: "9.9.9".to_string(),
            next_steps: vec!["Restart".to_string()],
            ..InstallConfig::default()
        };

        let report = install(&config, temp.path(), &bundle());

        assert_eq!(report.version, "9.9.9");
        assert_eq!(report.next_steps, vec!["Restart".to_string()]);
        assert_eq!(report.target_dir, temp.path());
    }
}
