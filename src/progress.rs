//! Progress reporting for file installation
//!
//! All progress goes through the [`ProgressReporter`] trait so the installer
//! does not care whether a bar is drawn. The command picks the implementation:
//! an indicatif bar normally, a no-op with `--quiet`.

use indicatif::{ProgressBar, ProgressStyle};

const MAX_PATH_DISPLAY: usize = 50;

/// Progress reporter for the file writing step
pub trait ProgressReporter {
    /// Initialize file progress with the total file count
    fn init_file_progress(&mut self, total_files: u64);

    /// Show the file currently being handled
    fn update_file(&mut self, file_path: &str);

    /// Finish file progress
    fn finish_files(&mut self);
}

/// Progress reporter drawing an indicatif bar on stderr
#[derive(Default)]
pub struct InteractiveProgressReporter {
    file_pb: Option<ProgressBar>,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn init_file_progress(&mut self, total_files: u64) {
        let file_style = ProgressStyle::default_bar()
            .template("  [{bar:40.green/yellow}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");

        let file_pb = ProgressBar::new(total_files);
        file_pb.set_style(file_style);
        self.file_pb = Some(file_pb);
    }

    fn update_file(&mut self, file_path: &str) {
        if let Some(ref file_pb) = self.file_pb {
            file_pb.set_message(truncate_path(file_path));
            file_pb.inc(1);
        }
    }

    fn finish_files(&mut self) {
        if let Some(file_pb) = self.file_pb.take() {
            file_pb.finish_and_clear();
        }
    }
}

/// No-op progress reporter for quiet runs and tests
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn init_file_progress(&mut self, _total_files: u64) {}

    fn update_file(&mut self, _file_path: &str) {}

    fn finish_files(&mut self) {}
}

/// Shorten long paths to their tail for display
fn truncate_path(file_path: &str) -> String {
    let count = file_path.chars().count();
    if count > MAX_PATH_DISPLAY {
        let tail: String = file_path
            .chars()
            .skip(count - (MAX_PATH_DISPLAY - 3))
            .collect();
        format!("...{tail}")
    } else {
        file_path.to_string()
    }
}
