//! Status command implementation.
//!
//! The `larder status` command reports the effective configuration, what
//! the interpreter says about itself, and whether the package repository
//! answers. It installs nothing.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::cli::args::StatusArgs;
use crate::error::Result;
use crate::library::select_library;
use crate::packages::PackageName;
use crate::repository::RepositoryProbe;
use crate::runtime::{Runtime, RuntimeCall};
use crate::session::probe_environment;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::Overrides;

/// The status command implementation.
pub struct StatusCommand {
    project_root: PathBuf,
    args: StatusArgs,
    overrides: Overrides,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(project_root: &Path, args: StatusArgs, overrides: Overrides) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
            overrides,
        }
    }
}

/// Query loadability of each package, read-only. A query that errors is
/// reported as unknown rather than failing the whole status run.
fn package_loadability(
    runtime: &dyn Runtime,
    packages: &[PackageName],
) -> Vec<(PackageName, Option<bool>)> {
    packages
        .iter()
        .map(|package| {
            let call = RuntimeCall::new("requireNamespace")
                .arg(package)
                .named_arg("quietly", true);
            (package.clone(), runtime.call_bool(&call).ok())
        })
        .collect()
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (config, source) = super::load_effective_config(&self.project_root, &self.overrides)?;

        let runtime = super::build_runtime(&config);
        let environment = probe_environment(&runtime);
        let repository = RepositoryProbe::new().check(&config.repository.url);

        let loadability = match &environment {
            Ok(_) => package_loadability(&runtime, &config.packages),
            Err(_) => Vec::new(),
        };

        if self.args.json {
            let packages: Vec<serde_json::Value> = loadability
                .iter()
                .map(|(package, loadable)| json!({ "package": package, "loadable": loadable }))
                .collect();
            let report = json!({
                "config": {
                    "source": source.as_ref().map(|p| p.display().to_string()),
                    "packages": config.packages,
                    "repository": config.repository.url,
                    "strategy": config.check.strategy,
                },
                "runtime": environment.as_ref().ok(),
                "runtime_error": environment.as_ref().err().map(|e| e.to_string()),
                "package_loadability": packages,
                "repository_status": repository,
            });
            ui.message(&serde_json::to_string_pretty(&report).unwrap_or_default());
            return Ok(match environment {
                Ok(_) => CommandResult::success(),
                Err(_) => CommandResult::failure(1),
            });
        }

        ui.show_header("Larder Status");

        match &source {
            Some(path) => ui.message(&format!("Configuration: {}", path.display())),
            None => ui.message("Configuration: built-in defaults"),
        }
        ui.message(&format!(
            "Packages: {}",
            config
                .packages
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        ui.message(&format!("Strategy: {}", config.check.strategy.as_str()));

        if repository.reachable {
            ui.success(&format!("Repository {} ({})", repository.url, repository.detail));
        } else {
            ui.warning(&format!(
                "Repository {} unreachable: {}",
                repository.url, repository.detail
            ));
        }

        match environment {
            Ok(env) => {
                ui.success(&format!("R {} at {}", env.version, env.home));
                let selection =
                    select_library(&env.library_paths, &config.library.user_path_marker).ok();
                for path in &env.library_paths {
                    let chosen = selection
                        .as_ref()
                        .map(|s| s.path.to_string_lossy() == path.as_str())
                        .unwrap_or(false);
                    if chosen {
                        ui.message(&format!("  * {path}"));
                    } else {
                        ui.message(&format!("    {path}"));
                    }
                }
                for (package, loadable) in &loadability {
                    match loadable {
                        Some(true) => ui.success(&format!("{package} loadable")),
                        Some(false) => ui.warning(&format!("{package} not loadable")),
                        None => ui.warning(&format!("{package}: loadability unknown")),
                    }
                }
                Ok(CommandResult::success())
            }
            Err(error) => {
                ui.error(&format!("R runtime unavailable: {error}"));
                Ok(CommandResult::failure(1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn offline_config(temp: &TempDir) {
        // Unreachable on both axes so the test never leaves the machine.
        fs::write(
            temp.path().join(".larder.yml"),
            "runtime:\n  program: /nonexistent/Rscript\nrepository:\n  url: http://127.0.0.1:9/\n",
        )
        .unwrap();
    }

    #[test]
    fn status_reports_a_missing_runtime() {
        let temp = TempDir::new().unwrap();
        offline_config(&temp);

        let cmd = StatusCommand::new(temp.path(), StatusArgs::default(), Overrides::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert!(!result.success);
        assert!(ui.has_error("R runtime unavailable"));
        assert!(ui.has_warning("unreachable"));
    }

    #[test]
    fn json_output_carries_the_error_detail() {
        let temp = TempDir::new().unwrap();
        offline_config(&temp);

        let args = StatusArgs { json: true };
        let cmd = StatusCommand::new(temp.path(), args, Overrides::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert!(!result.success);

        let output = ui.messages().join("\n");
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed["runtime"].is_null());
        assert!(parsed["runtime_error"].as_str().unwrap().contains("Rscript"));
        assert_eq!(parsed["repository_status"]["reachable"], false);
    }

    #[test]
    fn status_shows_the_configured_packages() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".larder.yml"),
            "packages: [zoo]\nruntime:\n  program: /nonexistent/Rscript\nrepository:\n  url: http://127.0.0.1:9/\n",
        )
        .unwrap();

        let cmd = StatusCommand::new(temp.path(), StatusArgs::default(), Overrides::default());
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();
        assert!(ui.has_message("Packages: zoo"));
    }
}
