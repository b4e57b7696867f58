//! Progress reporting for long-running CLI operations

use indicatif::{ProgressBar, ProgressStyle};

/// Console progress bar shown while rendering or exporting
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    /// Create a tracker over a known number of steps
    pub fn new(total: u64, description: &str) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        bar.set_message(description.to_string());

        ProgressTracker { bar }
    }

    /// Advance the bar
    pub fn increment(&self, amount: u64) {
        self.bar.inc(amount);
    }

    /// Update the step label
    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    /// Finish, replacing the label
    pub fn finish(&self, msg: &str) {
        self.bar.finish_with_message(msg.to_string());
    }
}
