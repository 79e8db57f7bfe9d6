//! Check command implementation.
//!
//! The `larder check` command verifies and repairs the package list
//! without discovering or preparing the library layout. Installs land
//! wherever the interpreter's own search path puts them.

use std::path::{Path, PathBuf};

use crate::cli::args::CheckArgs;
use crate::error::Result;
use crate::packages::{CheckProgress, PackageName};
use crate::session::Session;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::Overrides;

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    args: CheckArgs,
    overrides: Overrides,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project_root: &Path, args: CheckArgs, overrides: Overrides) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
            overrides,
        }
    }

    /// Packages from the command line, or the configured list.
    fn resolve_packages(&self, configured: &[PackageName]) -> Result<Vec<PackageName>> {
        if self.args.packages.is_empty() {
            return Ok(configured.to_vec());
        }
        self.args
            .packages
            .iter()
            .map(|name| PackageName::parse(name))
            .collect()
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (mut config, _) = super::load_effective_config(&self.project_root, &self.overrides)?;

        if let Some(strategy) = self.args.strategy {
            config.check.strategy = strategy;
        }

        let packages = match self.resolve_packages(&config.packages) {
            Ok(packages) => packages,
            Err(error) => {
                ui.error(&format!("{error}"));
                return Ok(CommandResult::failure(2));
            }
        };

        if packages.is_empty() {
            ui.message("No packages to check");
            return Ok(CommandResult::success());
        }

        let runtime = super::build_runtime(&config);
        let mut session = Session::new(config, runtime);

        let mut spinner = ui.start_spinner("Checking packages");
        let report = session.ensure_packages_report(&packages, &mut |progress| {
            if let CheckProgress::Checking {
                package,
                index,
                total,
            } = progress
            {
                spinner.set_message(&format!("Checking {package} ({}/{total})", index + 1));
            }
        });

        if report.is_satisfied() {
            let installed = report.installed_count();
            if installed == 0 {
                spinner.finish_success("All packages already loadable");
            } else {
                spinner.finish_success(&format!("{installed} package(s) installed"));
            }
        } else {
            spinner.finish_error("Package check failed");
        }

        for result in &report.packages {
            if result.outcome.is_resolved() {
                if ui.output_mode().shows_detail() {
                    ui.success(&format!("{}: {}", result.package, result.outcome.describe()));
                }
            } else {
                ui.error(&format!("{}: {}", result.package, result.outcome.describe()));
            }
        }

        if report.is_satisfied() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_packages_win_over_the_config() {
        let temp = TempDir::new().unwrap();
        let args = CheckArgs {
            packages: vec!["zoo".to_string(), "xts".to_string()],
            strategy: None,
        };
        let cmd = CheckCommand::new(temp.path(), args, Overrides::default());

        let configured = Config::default().packages;
        let resolved = cmd.resolve_packages(&configured).unwrap();
        let names: Vec<&str> = resolved.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["zoo", "xts"]);
    }

    #[test]
    fn no_arguments_falls_back_to_the_config() {
        let temp = TempDir::new().unwrap();
        let cmd = CheckCommand::new(temp.path(), CheckArgs::default(), Overrides::default());

        let configured = Config::default().packages;
        let resolved = cmd.resolve_packages(&configured).unwrap();
        assert_eq!(resolved, configured);
    }

    #[test]
    fn invalid_package_name_is_a_usage_error() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".larder.yml"),
            "runtime:\n  program: /nonexistent/Rscript\n",
        )
        .unwrap();

        let args = CheckArgs {
            packages: vec!["zoo; unlink('/')".to_string()],
            strategy: None,
        };
        let cmd = CheckCommand::new(temp.path(), args, Overrides::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
        assert!(!ui.errors().is_empty());
    }

    #[test]
    fn empty_configured_list_is_a_clean_success() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".larder.yml"), "packages: []\n").unwrap();

        let cmd = CheckCommand::new(temp.path(), CheckArgs::default(), Overrides::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert!(result.success);
        assert!(ui.has_message("No packages to check"));
    }

    #[test]
    fn missing_interpreter_reports_failure() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".larder.yml"),
            "packages: [zoo]\nruntime:\n  program: /nonexistent/Rscript\n",
        )
        .unwrap();

        let cmd = CheckCommand::new(temp.path(), CheckArgs::default(), Overrides::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }
}
