//! Configuration file discovery and loading.

use crate::config::schema::Config;
use crate::error::{LarderError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project configuration file name.
pub const CONFIG_FILE: &str = ".larder.yml";

/// Find the configuration file for a project.
///
/// Walks up from `start` looking for `.larder.yml`, then falls back to
/// `~/.larder.yml`. Returns `None` when neither exists; larder then runs on
/// compiled-in defaults.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            break;
        }
    }

    let home = dirs::home_dir()?.join(CONFIG_FILE);
    home.is_file().then_some(home)
}

/// Load and parse a single configuration file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist and
/// `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LarderError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LarderError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content, carrying `source_path` for error reporting.
pub fn parse_config(content: &str, source_path: &Path) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(content).map_err(|e| LarderError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the effective configuration for a project.
///
/// `config_override` (from `--config`) must exist; a discovered file is
/// optional. Duplicate package entries are dropped either way. Returns the
/// configuration and the path it came from, if any.
pub fn load_config(
    project_root: &Path,
    config_override: Option<&Path>,
) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, source) = match config_override {
        Some(path) => (load_config_file(path)?, Some(path.to_path_buf())),
        None => match find_config_file(project_root) {
            Some(path) => {
                debug!("using configuration from {}", path.display());
                (load_config_file(&path)?, Some(path))
            }
            None => {
                debug!("no configuration file found, using defaults");
                (Config::default(), None)
            }
        },
    };

    config.dedup_packages();
    config.validate()?;
    Ok((config, source))
}
