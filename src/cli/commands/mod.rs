//! Command implementations.

pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod init;
pub mod setup;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::error::Result;
use crate::runtime::RscriptRuntime;

/// Global overrides carried from the top-level CLI flags into each command.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Explicit config file from `--config`.
    pub config: Option<PathBuf>,
    /// Repository URL from `--repository` or `LARDER_REPOSITORY`.
    pub repository: Option<String>,
}

/// Load the effective configuration for a command.
///
/// Applies the repository override on top of whatever file (or defaults)
/// the loader came back with.
pub(crate) fn load_effective_config(
    project_root: &Path,
    overrides: &Overrides,
) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, source) = config::load_config(project_root, overrides.config.as_deref())?;
    if let Some(url) = &overrides.repository {
        config.repository.url = url.clone();
    }
    Ok((config, source))
}

/// Build the interpreter handle the configuration asks for.
pub(crate) fn build_runtime(config: &Config) -> RscriptRuntime {
    RscriptRuntime::new(config.runtime.program.clone(), &config.runtime.args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn repository_override_wins_over_the_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".larder.yml"),
            "repository:\n  url: https://file.example/\n",
        )
        .unwrap();

        let overrides = Overrides {
            repository: Some("https://flag.example/".to_string()),
            ..Default::default()
        };
        let (config, source) = load_effective_config(temp.path(), &overrides).unwrap();

        assert_eq!(config.repository.url, "https://flag.example/");
        assert_eq!(source.unwrap(), temp.path().join(".larder.yml"));
    }

    #[test]
    fn missing_override_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let overrides = Overrides {
            config: Some(temp.path().join("nope.yml")),
            ..Default::default()
        };
        assert!(load_effective_config(temp.path(), &overrides).is_err());
    }

    #[test]
    fn runtime_honors_configured_program() {
        let mut config = Config::default();
        config.runtime.program = "/opt/R/bin/Rscript".to_string();
        let runtime = build_runtime(&config);
        assert_eq!(runtime.program(), "/opt/R/bin/Rscript");
    }
}
