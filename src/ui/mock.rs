//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion, with scripted confirmation answers.
//! Shipped in the library so command tests (and downstream callers) can
//! drive command flows without a terminal.

use std::collections::VecDeque;

use crate::error::Result;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<String>,
    confirms_shown: Vec<String>,
    confirm_answers: VecDeque<bool>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Queue answers for upcoming confirmations, returned in order. An
    /// exhausted queue answers with the default.
    pub fn queue_confirm_answers(&mut self, answers: &[bool]) {
        self.confirm_answers.extend(answers.iter().copied());
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Get all confirmation questions that were shown.
    pub fn confirms_shown(&self) -> &[String] {
        &self.confirms_shown
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

/// Spinner handle that records nothing; the start message is captured by
/// the owning [`MockUI`].
struct MockSpinner;

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}
    fn finish_success(&mut self, _msg: &str) {}
    fn finish_error(&mut self, _msg: &str) {}
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        self.confirms_shown.push(question.to_string());
        Ok(self.confirm_answers.pop_front().unwrap_or(default))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner)
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_all_output_kinds() {
        let mut ui = MockUI::new();
        ui.message("checking");
        ui.success("done");
        ui.warning("careful");
        ui.error("boom");
        ui.show_header("larder");

        assert!(ui.has_message("checking"));
        assert!(ui.has_success("done"));
        assert!(ui.has_warning("careful"));
        assert!(ui.has_error("boom"));
        assert_eq!(ui.headers(), ["larder"]);
    }

    #[test]
    fn queued_confirm_answers_are_consumed_in_order() {
        let mut ui = MockUI::new();
        ui.queue_confirm_answers(&[false, true]);

        assert!(!ui.confirm("first?", true).unwrap());
        assert!(ui.confirm("second?", false).unwrap());
        // Exhausted queue falls back to the default.
        assert!(ui.confirm("third?", true).unwrap());
        assert_eq!(ui.confirms_shown().len(), 3);
    }

    #[test]
    fn spinner_messages_are_recorded() {
        let mut ui = MockUI::new();
        let mut spinner = ui.start_spinner("installing zoo");
        spinner.set_message("installing xts");
        spinner.finish_success("done");

        assert_eq!(ui.spinners(), ["installing zoo"]);
    }

    #[test]
    fn interactivity_is_scriptable() {
        let mut ui = MockUI::new();
        assert!(!ui.is_interactive());
        ui.set_interactive(true);
        assert!(ui.is_interactive());
    }
}
