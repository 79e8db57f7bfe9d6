//! Provisioning session.
//!
//! A [`Session`] owns the configuration, the runtime handle, and the two
//! pieces of run state (the completion flag and the chosen library), so
//! independent sessions never share anything. The boolean entry points
//! `initialize` and `ensure_packages` never raise; every error is logged
//! here at the boundary and folded into the returned flag. Callers who want
//! to know what failed use the `_report` variants.

pub mod probe;
pub mod report;

pub use probe::{probe_environment, RuntimeEnvironment};
pub use report::{SetupOutcome, SetupReport};

use crate::config::Config;
use crate::error::LarderError;
use crate::library::{prepare_user_library, select_library, LibrarySelection};
use crate::packages::{
    BatchChecker, CheckProgress, CheckReport, CheckStrategy, PackageChecker, PackageName,
};
use crate::runtime::Runtime;
use chrono::Utc;
use std::time::Instant;
use tracing::{info, warn};

/// One provisioning session against one runtime.
///
/// Safe to call repeatedly: each run re-derives everything from the live
/// runtime instead of trusting [`Session::setup_complete`].
pub struct Session<R: Runtime> {
    config: Config,
    runtime: R,
    setup_complete: bool,
    library: Option<LibrarySelection>,
}

impl<R: Runtime> Session<R> {
    pub fn new(config: Config, runtime: R) -> Self {
        Self {
            config,
            runtime,
            setup_complete: false,
            library: None,
        }
    }

    /// Whether the last full setup succeeded. Never reset by a failed run.
    pub fn setup_complete(&self) -> bool {
        self.setup_complete
    }

    /// The install destination chosen by the last run that got far enough
    /// to choose one.
    pub fn library(&self) -> Option<&LibrarySelection> {
        self.library.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Full setup with the configured package list.
    pub fn initialize(&mut self) -> bool {
        let packages = self.config.packages.clone();
        self.initialize_with(&packages)
    }

    /// Full setup with an explicit package list.
    pub fn initialize_with(&mut self, packages: &[PackageName]) -> bool {
        self.initialize_report(packages, &mut |_| {}).is_complete()
    }

    /// Full setup, reporting what happened at each step.
    ///
    /// Discovers the environment, selects and (for a user-scoped selection)
    /// prepares the library directory, then runs the package check. Sets the
    /// completion flag only when everything succeeded.
    pub fn initialize_report(
        &mut self,
        packages: &[PackageName],
        progress: &mut dyn FnMut(CheckProgress),
    ) -> SetupReport {
        let started_at = Utc::now();
        let timer = Instant::now();

        let mut environment = None;
        let mut library = None;
        let mut check = None;

        let outcome = match self.run_setup(packages, progress, &mut environment, &mut library, &mut check)
        {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!("setup failed: {error}");
                match error {
                    LarderError::RuntimeUnreachable { message, .. } => {
                        SetupOutcome::RuntimeUnreachable { message }
                    }
                    LarderError::LibraryUnusable { path, message } => {
                        SetupOutcome::LibraryUnusable { path, message }
                    }
                    other => SetupOutcome::Errored {
                        message: other.to_string(),
                    },
                }
            }
        };

        if matches!(outcome, SetupOutcome::Completed) {
            self.setup_complete = true;
            info!("setup complete");
        }

        SetupReport {
            outcome,
            environment,
            library,
            check,
            started_at,
            duration_ms: timer.elapsed().as_millis() as u64,
        }
    }

    fn run_setup(
        &mut self,
        packages: &[PackageName],
        progress: &mut dyn FnMut(CheckProgress),
        environment: &mut Option<RuntimeEnvironment>,
        library: &mut Option<LibrarySelection>,
        check: &mut Option<CheckReport>,
    ) -> crate::error::Result<SetupOutcome> {
        let env = probe_environment(&self.runtime)?;
        *environment = Some(env.clone());

        let selection = self.select_library(&env)?;
        prepare_user_library(&selection, self.config.library.clean)?;
        *library = Some(selection.clone());
        self.library = Some(selection.clone());

        let report = self.run_check(packages, Some(&selection), progress);
        let satisfied = report.is_satisfied();
        *check = Some(report);

        if satisfied {
            Ok(SetupOutcome::Completed)
        } else {
            warn!("package check reported failure");
            Ok(SetupOutcome::CheckFailed)
        }
    }

    /// The explicit config override wins over discovery.
    fn select_library(&self, env: &RuntimeEnvironment) -> crate::error::Result<LibrarySelection> {
        if let Some(path) = &self.config.library.path {
            return Ok(LibrarySelection::user(path));
        }
        select_library(&env.library_paths, &self.config.library.user_path_marker)
    }

    /// Verify and repair the configured package list without touching the
    /// library layout.
    pub fn ensure_packages(&mut self) -> bool {
        let packages = self.config.packages.clone();
        self.ensure_packages_with(&packages)
    }

    /// Verify and repair an explicit package list.
    pub fn ensure_packages_with(&mut self, packages: &[PackageName]) -> bool {
        self.ensure_packages_report(packages, &mut |_| {})
            .is_satisfied()
    }

    /// The package check alone, reporting per-package outcomes.
    pub fn ensure_packages_report(
        &mut self,
        packages: &[PackageName],
        progress: &mut dyn FnMut(CheckProgress),
    ) -> CheckReport {
        let library = self.library.clone();
        self.run_check(packages, library.as_ref(), progress)
    }

    fn run_check(
        &self,
        packages: &[PackageName],
        library: Option<&LibrarySelection>,
        progress: &mut dyn FnMut(CheckProgress),
    ) -> CheckReport {
        let repository = self.config.repository.url.as_str();
        match self.config.check.strategy {
            CheckStrategy::Sequential => PackageChecker::new(&self.runtime, repository)
                .with_bootstrap(self.config.check.bootstrap.clone())
                .with_library(
                    library
                        .filter(|l| l.is_user_scoped())
                        .map(|l| l.path.as_path()),
                )
                .run(packages, progress),
            CheckStrategy::Batch => BatchChecker::new(&self.runtime, repository).run(packages),
        }
    }
}
