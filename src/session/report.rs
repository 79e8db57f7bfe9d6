//! Setup run reports.
//!
//! The boolean entry points stay boolean; these types carry the richer
//! answer (which step failed, for which package) for callers and for
//! `larder status --json`.

use crate::library::LibrarySelection;
use crate::packages::CheckReport;
use crate::session::probe::RuntimeEnvironment;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// How a full setup run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SetupOutcome {
    /// Environment discovered, library prepared, every package loadable.
    Completed,
    /// The interpreter could not be reached at all.
    RuntimeUnreachable { message: String },
    /// The selected library directory could not be created or cleaned.
    LibraryUnusable { path: PathBuf, message: String },
    /// Discovery succeeded but the package check reported failure.
    CheckFailed,
    /// The run aborted on an unexpected error.
    Errored { message: String },
}

/// Result of one `Session::initialize` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupReport {
    pub outcome: SetupOutcome,
    /// Probed environment, present once the runtime answered.
    pub environment: Option<RuntimeEnvironment>,
    /// The chosen install destination, present once selection succeeded.
    pub library: Option<LibrarySelection>,
    /// The package check, present when the run got that far.
    pub check: Option<CheckReport>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl SetupReport {
    /// The boolean contract: true only for a fully completed run.
    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, SetupOutcome::Completed)
    }

    /// One-line description for logs and terminal output.
    pub fn describe(&self) -> String {
        match &self.outcome {
            SetupOutcome::Completed => {
                let installed = self
                    .check
                    .as_ref()
                    .map(|c| c.installed_count())
                    .unwrap_or(0);
                if installed == 0 {
                    "all packages already loadable".to_string()
                } else {
                    format!("{installed} package(s) installed")
                }
            }
            SetupOutcome::RuntimeUnreachable { message } => {
                format!("runtime unreachable: {message}")
            }
            SetupOutcome::LibraryUnusable { path, message } => {
                format!("library {} unusable: {message}", path.display())
            }
            SetupOutcome::CheckFailed => "package check failed".to_string(),
            SetupOutcome::Errored { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::{CheckOutcome, CheckStrategy};

    fn base_report(outcome: SetupOutcome) -> SetupReport {
        SetupReport {
            outcome,
            environment: None,
            library: None,
            check: None,
            started_at: Utc::now(),
            duration_ms: 5,
        }
    }

    #[test]
    fn only_completed_counts_as_complete() {
        assert!(base_report(SetupOutcome::Completed).is_complete());
        assert!(!base_report(SetupOutcome::CheckFailed).is_complete());
        assert!(!base_report(SetupOutcome::RuntimeUnreachable {
            message: "gone".into()
        })
        .is_complete());
    }

    #[test]
    fn describe_names_the_failing_step() {
        let report = base_report(SetupOutcome::LibraryUnusable {
            path: PathBuf::from("/home/u/Library/R"),
            message: "permission denied".into(),
        });
        let text = report.describe();
        assert!(text.contains("/home/u/Library/R"));
        assert!(text.contains("permission denied"));
    }

    #[test]
    fn describe_counts_installs() {
        let mut report = base_report(SetupOutcome::Completed);
        assert_eq!(report.describe(), "all packages already loadable");

        report.check = Some(CheckReport {
            strategy: CheckStrategy::Sequential,
            outcome: CheckOutcome::Satisfied,
            packages: vec![],
            started_at: Utc::now(),
            duration_ms: 1,
        });
        assert_eq!(report.describe(), "all packages already loadable");
    }

    #[test]
    fn report_serializes_with_tagged_outcome() {
        let report = base_report(SetupOutcome::CheckFailed);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"outcome\":\"check_failed\""));
    }
}
