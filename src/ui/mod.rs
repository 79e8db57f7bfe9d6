//! Terminal output and prompts.
//!
//! Commands talk to the terminal through the [`UserInterface`] trait, so
//! tests can assert on output through [`MockUI`] instead of capturing
//! stdout. [`create_ui`] picks the interactive or plain implementation.

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, LarderTheme};

use crate::error::Result;

/// Trait for user interface interactions.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a plain message.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question. Non-interactive implementations answer with
    /// the default.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}
