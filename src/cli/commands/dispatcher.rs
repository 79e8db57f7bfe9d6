//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

use super::Overrides;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command against the given user interface.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it. No subcommand means `setup`.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let overrides = Overrides {
            config: cli.config.clone(),
            repository: cli.repository.clone(),
        };

        match &cli.command {
            Some(Commands::Setup(args)) => {
                let cmd = super::setup::SetupCommand::new(&self.project_root, args.clone(), overrides);
                cmd.execute(ui)
            }
            Some(Commands::Check(args)) => {
                let cmd = super::check::CheckCommand::new(&self.project_root, args.clone(), overrides);
                cmd.execute(ui)
            }
            Some(Commands::Status(args)) => {
                let cmd = super::status::StatusCommand::new(&self.project_root, args.clone(), overrides);
                cmd.execute(ui)
            }
            Some(Commands::Init(args)) => {
                let cmd = super::init::InitCommand::new(&self.project_root, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                let cmd = super::setup::SetupCommand::new(
                    &self.project_root,
                    crate::cli::args::SetupArgs::default(),
                    overrides,
                );
                cmd.execute(ui)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatcher_creation() {
        let dispatcher = CommandDispatcher::new(std::path::PathBuf::from("/test"));
        assert_eq!(dispatcher.project_root(), std::path::Path::new("/test"));
    }
}
