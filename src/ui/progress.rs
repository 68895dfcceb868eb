//! Progress reporting

use indicatif::{ProgressBar, ProgressStyle};

/// Per-task upload progress.
///
/// `start` is called once per task that has files, `increment` once per
/// uploaded file and `stop` when the task is done or the run fails.
pub trait UploadProgress {
    fn start(&mut self, task: &str, total: u64);
    fn increment(&mut self);
    fn stop(&mut self);
}

/// Terminal progress bar, one bar per task
pub struct ProgressBarReporter {
    bar: Option<ProgressBar>,
}

impl ProgressBarReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        Self { bar: None }
    }

    fn styled_bar(total: u64) -> ProgressBar {
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::with_template(
            "  Upload |{bar:40}| {percent}%   {pos}/{len} files   {elapsed_precise} {msg}",
        ) {
            bar.set_style(style.progress_chars("█░"));
        }
        bar
    }
}

impl Default for ProgressBarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadProgress for ProgressBarReporter {
    fn start(&mut self, task: &str, total: u64) {
        // A bar left over from a previous task is finished, never reused
        if let Some(previous) = self.bar.take() {
            previous.finish();
        }
        let bar = Self::styled_bar(total);
        bar.set_message(task.to_string());
        self.bar = Some(bar);
    }

    fn increment(&mut self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn stop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}
