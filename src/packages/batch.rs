//! Batch check strategy.
//!
//! One evaluation of the fixed helper routines checks every package,
//! installs the whole missing set, and rechecks, printing a line-oriented
//! summary this module parses back. Unlike the sequential strategy there is
//! no bootstrap install and no short-circuit: every package gets its one
//! install attempt before failure is reported, in aggregate.

use crate::assets;
use crate::packages::status::{CheckOutcome, CheckReport, CheckStrategy, PackageOutcome, PackageResult};
use crate::packages::PackageName;
use crate::runtime::{Runtime, RuntimeCall};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, warn};

const PACKAGE_PREFIX: &str = "larder:package ";
const RESULT_PREFIX: &str = "larder:result ";

/// Hands the whole package list to the interpreter in one evaluation.
pub struct BatchChecker<'a> {
    runtime: &'a dyn Runtime,
    repository: &'a str,
}

impl<'a> BatchChecker<'a> {
    pub fn new(runtime: &'a dyn Runtime, repository: &'a str) -> Self {
        Self { runtime, repository }
    }

    /// Run the batch check, producing a report.
    pub fn run(&self, packages: &[PackageName]) -> CheckReport {
        let started_at = Utc::now();
        let timer = Instant::now();

        let (outcome, results) = match self.run_inner(packages) {
            Ok(parsed) => parsed,
            Err(message) => {
                warn!("batch check failed: {message}");
                (CheckOutcome::Errored { message }, Vec::new())
            }
        };

        CheckReport {
            strategy: CheckStrategy::Batch,
            outcome,
            packages: results,
            started_at,
            duration_ms: timer.elapsed().as_millis() as u64,
        }
    }

    fn run_inner(
        &self,
        packages: &[PackageName],
    ) -> std::result::Result<(CheckOutcome, Vec<PackageResult>), String> {
        if packages.is_empty() {
            return Ok((CheckOutcome::Satisfied, Vec::new()));
        }

        let script = self.render_script(packages).map_err(|e| e.to_string())?;
        let output = self.runtime.eval(&script).map_err(|e| e.to_string())?;
        self.parse_output(packages, &output)
    }

    /// The fixed helper routines plus one driver call with the interpolated
    /// (pre-validated) names and repository URL.
    fn render_script(&self, packages: &[PackageName]) -> crate::error::Result<String> {
        let names: Vec<String> = packages.iter().map(|p| p.as_str().to_string()).collect();
        let driver = RuntimeCall::new("larder.ensure")
            .arg(names)
            .arg(self.repository);
        Ok(format!(
            "{}\n{}\n",
            assets::batch_helpers()?,
            driver.render_invisible()
        ))
    }

    fn parse_output(
        &self,
        packages: &[PackageName],
        output: &str,
    ) -> std::result::Result<(CheckOutcome, Vec<PackageResult>), String> {
        let mut results = Vec::with_capacity(packages.len());
        let mut satisfied = None;

        for line in output.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix(PACKAGE_PREFIX) {
                let (name, outcome) = rest.split_once(' ').unwrap_or((rest, ""));
                let Some(package) = packages.iter().find(|p| p.as_str() == name) else {
                    debug!("ignoring report line for unrequested package {name:?}");
                    continue;
                };
                let outcome = match outcome.split_once(' ') {
                    Some(("error", message)) => PackageOutcome::Errored {
                        message: message.to_string(),
                    },
                    _ => match outcome {
                        "already" => PackageOutcome::AlreadyLoadable,
                        "installed" => PackageOutcome::Installed,
                        "failed" => PackageOutcome::InstallFailed,
                        other => {
                            return Err(format!(
                                "unrecognized outcome {other:?} for package '{package}'"
                            ))
                        }
                    },
                };
                if !outcome.is_resolved() {
                    warn!("package '{package}' could not be made loadable");
                }
                results.push(PackageResult {
                    package: package.clone(),
                    outcome,
                });
            } else if let Some(rest) = line.strip_prefix(RESULT_PREFIX) {
                satisfied = Some(rest == "satisfied");
            }
        }

        match satisfied {
            Some(true) => Ok((CheckOutcome::Satisfied, results)),
            Some(false) => {
                let unresolved = results
                    .iter()
                    .filter(|r| !r.outcome.is_resolved())
                    .map(|r| r.package.clone())
                    .collect();
                Ok((CheckOutcome::Unresolved {
                    packages: unresolved,
                }, results))
            }
            None => Err("helper output carried no result line".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::FakeRuntime;

    fn names(items: &[&str]) -> Vec<PackageName> {
        items.iter().map(|n| PackageName::parse(n).unwrap()).collect()
    }

    const REPO: &str = "https://cloud.r-project.org/";

    #[test]
    fn script_carries_helpers_and_driver_call() {
        let runtime = FakeRuntime::new().with_eval_output(
            "larder:package zoo already\nlarder:result satisfied\n",
        );
        let checker = BatchChecker::new(&runtime, REPO);

        let report = checker.run(&names(&["zoo"]));

        assert!(report.is_satisfied());
        let scripts = runtime.eval_scripts();
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("larder.ensure <- function(packages, repos)"));
        assert!(scripts[0].contains(
            "invisible(larder.ensure(c(\"zoo\"), \"https://cloud.r-project.org/\"))"
        ));
    }

    #[test]
    fn every_package_gets_its_attempt_before_failure() {
        let runtime = FakeRuntime::new().with_eval_output(
            "larder:package zoo already\n\
             larder:package forecast failed\n\
             larder:package tseries installed\n\
             larder:result unresolved\n",
        );
        let checker = BatchChecker::new(&runtime, REPO);

        let report = checker.run(&names(&["zoo", "forecast", "tseries"]));

        assert!(!report.is_satisfied());
        assert_eq!(report.packages.len(), 3);
        assert!(matches!(
            &report.outcome,
            CheckOutcome::Unresolved { packages } if packages.len() == 1 && packages[0] == "forecast"
        ));
        assert_eq!(report.installed_count(), 1);
    }

    #[test]
    fn error_outcomes_keep_their_message() {
        let runtime = FakeRuntime::new().with_eval_output(
            "larder:package zoo error unable to access repository\nlarder:result unresolved\n",
        );
        let checker = BatchChecker::new(&runtime, REPO);

        let report = checker.run(&names(&["zoo"]));

        assert!(matches!(
            &report.packages[0].outcome,
            PackageOutcome::Errored { message } if message.contains("unable to access")
        ));
    }

    #[test]
    fn missing_result_line_is_an_error() {
        let runtime = FakeRuntime::new().with_eval_output("larder:package zoo already\n");
        let checker = BatchChecker::new(&runtime, REPO);

        let report = checker.run(&names(&["zoo"]));

        assert!(matches!(report.outcome, CheckOutcome::Errored { .. }));
    }

    #[test]
    fn eval_failure_is_folded_into_the_report() {
        let runtime = FakeRuntime::new().with_eval_failure("interpreter exited");
        let checker = BatchChecker::new(&runtime, REPO);

        let report = checker.run(&names(&["zoo"]));

        assert!(!report.is_satisfied());
        assert!(matches!(
            &report.outcome,
            CheckOutcome::Errored { message } if message.contains("interpreter exited")
        ));
    }

    #[test]
    fn unrequested_package_lines_are_ignored() {
        let runtime = FakeRuntime::new().with_eval_output(
            "larder:package zoo already\n\
             larder:package sneaky installed\n\
             larder:result satisfied\n",
        );
        let checker = BatchChecker::new(&runtime, REPO);

        let report = checker.run(&names(&["zoo"]));

        assert!(report.is_satisfied());
        assert_eq!(report.packages.len(), 1);
    }

    #[test]
    fn empty_list_skips_the_interpreter() {
        let runtime = FakeRuntime::new();
        let checker = BatchChecker::new(&runtime, REPO);

        let report = checker.run(&[]);

        assert!(report.is_satisfied());
        assert!(runtime.eval_scripts().is_empty());
    }
}
