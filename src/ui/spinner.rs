//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::theme::LarderTheme;
use super::SpinnerHandle;

/// A progress spinner for long-running operations.
pub struct ProgressSpinner {
    bar: ProgressBar,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .expect("spinner template is valid"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar }
    }

    /// Create a spinner that doesn't show (for quiet mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    fn finish(&mut self, msg: String) {
        self.bar.set_style(
            ProgressStyle::default_spinner()
                .template("{msg}")
                .expect("spinner template is valid"),
        );
        self.bar.finish_with_message(msg);
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let theme = LarderTheme::new();
        self.finish(theme.format_success(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        let theme = LarderTheme::new();
        self.finish(theme.format_error(msg));
    }
}
