//! Non-interactive UI for CI/headless environments.

use crate::error::Result;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Plain line output with no spinner animation, suitable for logs.
/// Confirmations are answered with their default instead of prompting.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn confirm(&mut self, _question: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_status() {
            println!("{}", message);
        }
        Box::new(LogSpinner { mode: self.mode })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that logs plain lines instead of animating.
struct LogSpinner {
    mode: OutputMode,
}

impl SpinnerHandle for LogSpinner {
    fn set_message(&mut self, msg: &str) {
        if self.mode.shows_detail() {
            println!("{}", msg);
        }
    }

    fn finish_success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_is_not_interactive() {
        let ui = NonInteractiveUI::new(OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn confirm_answers_with_default() {
        let mut ui = NonInteractiveUI::new(OutputMode::Normal);
        assert!(ui.confirm("Proceed?", true).unwrap());
        assert!(!ui.confirm("Proceed?", false).unwrap());
    }

    #[test]
    fn output_mode_is_preserved() {
        let ui = NonInteractiveUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }
}
