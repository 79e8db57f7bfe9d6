//! Setup command implementation.
//!
//! The `larder setup` command (also the default with no subcommand) runs
//! a full provisioning pass: probe the interpreter, select and prepare the
//! library directory, then check and repair the package list.

use std::path::{Path, PathBuf};

use crate::cli::args::SetupArgs;
use crate::error::Result;
use crate::packages::CheckProgress;
use crate::repository::RepositoryProbe;
use crate::session::Session;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::Overrides;

/// The setup command implementation.
pub struct SetupCommand {
    project_root: PathBuf,
    args: SetupArgs,
    overrides: Overrides,
}

impl SetupCommand {
    /// Create a new setup command.
    pub fn new(project_root: &Path, args: SetupArgs, overrides: Overrides) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
            overrides,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl Command for SetupCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (mut config, source) = super::load_effective_config(&self.project_root, &self.overrides)?;

        ui.show_header("R Environment Setup");
        match &source {
            Some(path) => ui.message(&format!("Using configuration from {}", path.display())),
            None => ui.message("No configuration file found, using defaults"),
        }

        if self.args.no_clean {
            config.library.clean = false;
        }

        // Ask once, up front. Declining keeps the existing library contents.
        if config.library.clean && ui.is_interactive() && !self.args.yes {
            let keep_clean = ui.confirm(
                "Reset the user library before installing? Existing packages there will be removed.",
                true,
            )?;
            if !keep_clean {
                config.library.clean = false;
                ui.message("Keeping the existing user library");
            }
        }

        if self.args.preflight {
            let status = RepositoryProbe::new().check(&config.repository.url);
            if status.reachable {
                ui.success(&format!("Repository {} reachable ({})", status.url, status.detail));
            } else {
                ui.error(&format!(
                    "Repository {} unreachable: {}",
                    status.url, status.detail
                ));
                return Ok(CommandResult::failure(1));
            }
        }

        let packages = config.packages.clone();
        ui.message(&format!(
            "Ensuring {} package(s): {}",
            packages.len(),
            packages
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        let runtime = super::build_runtime(&config);
        let mut session = Session::new(config, runtime);

        let mut spinner = ui.start_spinner("Probing R environment");
        let report = session.initialize_report(&packages, &mut |progress| match progress {
            CheckProgress::Bootstrap { package } => {
                spinner.set_message(&format!("Installing tooling package {package}"));
            }
            CheckProgress::Checking {
                package,
                index,
                total,
            } => {
                spinner.set_message(&format!("Checking {package} ({}/{total})", index + 1));
            }
            CheckProgress::Resolved { .. } => {}
        });

        if report.is_complete() {
            spinner.finish_success(&format!("Setup complete: {}", report.describe()));
        } else {
            spinner.finish_error(&format!("Setup failed: {}", report.describe()));
        }

        if let Some(env) = &report.environment {
            ui.message(&format!("R {} at {}", env.version, env.home));
        }
        if let Some(library) = &report.library {
            ui.message(&format!("Library: {}", library.path.display()));
        }
        if let Some(check) = &report.check {
            if ui.output_mode().shows_detail() {
                for result in &check.packages {
                    ui.message(&format!("  {}: {}", result.package, result.outcome.describe()));
                }
            }
        }

        if report.is_complete() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn broken_runtime_config(temp: &TempDir) {
        fs::write(
            temp.path().join(".larder.yml"),
            "runtime:\n  program: /nonexistent/Rscript\n",
        )
        .unwrap();
    }

    #[test]
    fn setup_command_creation() {
        let temp = TempDir::new().unwrap();
        let cmd = SetupCommand::new(temp.path(), SetupArgs::default(), Overrides::default());
        assert_eq!(cmd.project_root(), temp.path());
    }

    #[test]
    fn missing_interpreter_fails_cleanly() {
        let temp = TempDir::new().unwrap();
        broken_runtime_config(&temp);

        let cmd = SetupCommand::new(temp.path(), SetupArgs::default(), Overrides::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn interactive_setup_asks_before_cleaning() {
        let temp = TempDir::new().unwrap();
        broken_runtime_config(&temp);

        let cmd = SetupCommand::new(temp.path(), SetupArgs::default(), Overrides::default());
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.queue_confirm_answers(&[false]);

        cmd.execute(&mut ui).unwrap();

        assert_eq!(ui.confirms_shown().len(), 1);
        assert!(ui.has_message("Keeping the existing user library"));
    }

    #[test]
    fn yes_flag_skips_the_prompt() {
        let temp = TempDir::new().unwrap();
        broken_runtime_config(&temp);

        let args = SetupArgs {
            yes: true,
            ..Default::default()
        };
        let cmd = SetupCommand::new(temp.path(), args, Overrides::default());
        let mut ui = MockUI::new();
        ui.set_interactive(true);

        cmd.execute(&mut ui).unwrap();
        assert!(ui.confirms_shown().is_empty());
    }

    #[test]
    fn no_clean_flag_skips_the_prompt() {
        let temp = TempDir::new().unwrap();
        broken_runtime_config(&temp);

        let args = SetupArgs {
            no_clean: true,
            ..Default::default()
        };
        let cmd = SetupCommand::new(temp.path(), args, Overrides::default());
        let mut ui = MockUI::new();
        ui.set_interactive(true);

        cmd.execute(&mut ui).unwrap();
        assert!(ui.confirms_shown().is_empty());
    }

    #[test]
    fn setup_lists_configured_packages() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".larder.yml"),
            "packages: [zoo, xts]\nruntime:\n  program: /nonexistent/Rscript\n",
        )
        .unwrap();

        let cmd = SetupCommand::new(temp.path(), SetupArgs::default(), Overrides::default());
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();
        assert!(ui.has_message("zoo, xts"));
    }
}
