//! Command-line interface for larder.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands, CompletionsArgs, InitArgs, SetupArgs, StatusArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
