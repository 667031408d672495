//! Terminal progress bar for pipeline runs

use crate::progress::ProgressHandler;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner} [{bar:30}] {pos:>3}% {msg}";

/// Draws run progress and the current stage label with indicatif
pub struct ProgressBarHandler {
    bar: ProgressBar,
}

impl ProgressBarHandler {
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(100))
    }

    /// Handler that tracks progress without drawing anything
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        bar.set_length(100);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn message(&self) -> String {
        self.bar.message()
    }

    /// Removes the bar from the terminal once the run has settled
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressBarHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressHandler for ProgressBarHandler {
    fn on_progress(&self, fraction: u8) {
        self.bar.set_position(u64::from(fraction));
    }

    fn on_stage(&self, label: &str) {
        self.bar.set_message(label.to_string());
    }
}
