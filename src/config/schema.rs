//! Typed configuration schema.

use crate::error::LarderError;
use crate::packages::{CheckStrategy, PackageName};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// The package list shipped as a default when a project declares none.
pub fn default_packages() -> Vec<PackageName> {
    ["jsonlite", "data.table", "forecast", "tseries", "zoo"]
        .iter()
        .map(|name| PackageName::parse(name).expect("default package names are valid"))
        .collect()
}

fn default_repository_url() -> String {
    "https://cloud.r-project.org/".to_string()
}

fn default_program() -> String {
    crate::runtime::rscript::DEFAULT_PROGRAM.to_string()
}

fn default_runtime_args() -> Vec<String> {
    crate::runtime::rscript::default_args()
}

fn default_user_path_marker() -> String {
    "Library".to_string()
}

fn default_clean() -> bool {
    true
}

fn default_bootstrap() -> Option<PackageName> {
    Some(PackageName::parse("remotes").expect("default bootstrap name is valid"))
}

/// Top-level larder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Packages to keep installed and loadable, in check order.
    #[serde(default = "default_packages")]
    pub packages: Vec<PackageName>,

    #[serde(default)]
    pub repository: RepositorySettings,

    #[serde(default)]
    pub runtime: RuntimeSettings,

    #[serde(default)]
    pub library: LibrarySettings,

    #[serde(default)]
    pub check: CheckSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            packages: default_packages(),
            repository: RepositorySettings::default(),
            runtime: RuntimeSettings::default(),
            library: LibrarySettings::default(),
            check: CheckSettings::default(),
        }
    }
}

impl Config {
    /// Drop duplicate package entries, keeping first-occurrence order.
    ///
    /// Historic project files list some packages twice; a duplicate is an
    /// artifact, not a second requirement.
    pub fn dedup_packages(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.packages.retain(|package| {
            let fresh = seen.insert(package.clone());
            if !fresh {
                debug!("dropping duplicate package entry '{package}'");
            }
            fresh
        });
    }

    /// Reject values that would only fail later, in confusing ways.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.repository.url.trim().is_empty() {
            return Err(LarderError::ConfigValidationError {
                message: "repository.url must not be empty".to_string(),
            });
        }
        if self.runtime.program.trim().is_empty() {
            return Err(LarderError::ConfigValidationError {
                message: "runtime.program must not be empty".to_string(),
            });
        }
        if self.library.user_path_marker.is_empty() {
            return Err(LarderError::ConfigValidationError {
                message: "library.user_path_marker must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Where installs come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositorySettings {
    /// Any CRAN-compatible mirror.
    #[serde(default = "default_repository_url")]
    pub url: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            url: default_repository_url(),
        }
    }
}

/// How to start the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeSettings {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_runtime_args")]
    pub args: Vec<String>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_runtime_args(),
        }
    }
}

/// Library directory selection and cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibrarySettings {
    /// Explicit install destination, bypassing search path discovery.
    /// Treated as user-scoped.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Substring that marks a search path entry as user-scoped.
    #[serde(default = "default_user_path_marker")]
    pub user_path_marker: String,

    /// Recreate the user library from scratch during setup.
    #[serde(default = "default_clean")]
    pub clean: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            path: None,
            user_path_marker: default_user_path_marker(),
            clean: default_clean(),
        }
    }
}

/// Check strategy selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckSettings {
    #[serde(default)]
    pub strategy: CheckStrategy,

    /// Helper tooling installed up front by the sequential strategy,
    /// whether or not it is already present. `null` skips it. The batch
    /// strategy never installs it.
    #[serde(default = "default_bootstrap")]
    pub bootstrap: Option<PackageName>,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            strategy: CheckStrategy::default(),
            bootstrap: default_bootstrap(),
        }
    }
}
