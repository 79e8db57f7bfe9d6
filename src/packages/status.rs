//! Outcome types for package checks.

use crate::packages::PackageName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a run walks the package list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStrategy {
    /// Check and repair one package at a time, stopping at the first failure.
    #[default]
    Sequential,
    /// Hand the whole list to the interpreter in a single evaluation.
    Batch,
}

impl CheckStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Batch => "batch",
        }
    }
}

impl std::str::FromStr for CheckStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "batch" => Ok(Self::Batch),
            _ => Err(format!("unknown check strategy: {s} (expected sequential or batch)")),
        }
    }
}

/// What happened to a single package during a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PackageOutcome {
    /// Loadable before we touched anything.
    AlreadyLoadable,
    /// Missing, installed, and loadable afterwards.
    Installed,
    /// Install ran to completion but the package still does not load.
    InstallFailed,
    /// The check or install itself raised an error.
    Errored { message: String },
}

impl PackageOutcome {
    /// Whether the package ended up loadable.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::AlreadyLoadable | Self::Installed)
    }

    /// Short label for terminal output.
    pub fn describe(&self) -> String {
        match self {
            Self::AlreadyLoadable => "already loadable".to_string(),
            Self::Installed => "installed".to_string(),
            Self::InstallFailed => "install failed".to_string(),
            Self::Errored { message } => format!("error: {message}"),
        }
    }
}

/// Per-package record within a [`CheckReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageResult {
    pub package: PackageName,
    #[serde(flatten)]
    pub outcome: PackageOutcome,
}

/// Overall verdict of a check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Every requested package is loadable.
    Satisfied,
    /// The bootstrap tooling package could not be made loadable.
    BootstrapFailed { message: String },
    /// One or more packages could not be made loadable.
    Unresolved { packages: Vec<PackageName> },
    /// The run aborted before producing a per-package answer.
    Errored { message: String },
}

/// Result of one full pass over the requested packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub strategy: CheckStrategy,
    pub outcome: CheckOutcome,
    /// Per-package results, in request order, for the packages that were
    /// reached before the run stopped.
    pub packages: Vec<PackageResult>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl CheckReport {
    /// The boolean contract: true only when every package is loadable.
    pub fn is_satisfied(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Satisfied)
    }

    /// Number of packages that had to be installed during this run.
    pub fn installed_count(&self) -> usize {
        self.packages
            .iter()
            .filter(|r| r.outcome == PackageOutcome::Installed)
            .count()
    }
}
