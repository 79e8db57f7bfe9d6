//! Init command implementation.
//!
//! The `larder init` command writes a starter `.larder.yml` into the
//! project root.

use std::fs;
use std::path::{Path, PathBuf};

use crate::assets;
use crate::cli::args::InitArgs;
use crate::config::CONFIG_FILE;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The init command implementation.
pub struct InitCommand {
    project_root: PathBuf,
    args: InitArgs,
}

impl InitCommand {
    /// Create a new init command.
    pub fn new(project_root: &Path, args: InitArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn config_path(&self) -> PathBuf {
        self.project_root.join(CONFIG_FILE)
    }
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = self.config_path();

        if path.exists() && !self.args.force {
            ui.warning("Configuration already exists. Use --force to overwrite.");
            return Ok(CommandResult::failure(1));
        }

        fs::write(&path, assets::starter_config()?)?;

        ui.success(&format!("Created {CONFIG_FILE}"));
        ui.message("\nNext steps:");
        ui.message(&format!("  1. Review {CONFIG_FILE} and adjust the package list"));
        ui.message("  2. Run `larder` to set up your R environment");

        Ok(CommandResult::success())
    }
}
