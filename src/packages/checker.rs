//! Sequential check-and-repair strategy.

use crate::error::Result;
use crate::packages::status::{CheckOutcome, CheckReport, CheckStrategy, PackageOutcome, PackageResult};
use crate::packages::PackageName;
use crate::runtime::{Runtime, RuntimeCall};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

/// Progress notifications emitted while a check runs.
///
/// Commands feed these into a spinner; library callers can ignore them.
#[derive(Debug, Clone)]
pub enum CheckProgress {
    /// The bootstrap tooling package is being installed.
    Bootstrap { package: PackageName },
    /// A package from the list is being checked.
    Checking {
        package: PackageName,
        index: usize,
        total: usize,
    },
    /// A package finished with the given outcome.
    Resolved {
        package: PackageName,
        outcome: PackageOutcome,
    },
}

/// Walks the package list in order, repairing as it goes.
///
/// Each package is queried for loadability, installed from the repository
/// when missing, and re-queried. The first package that stays unloadable
/// ends the run; later entries are never touched. Errors while processing
/// one package are folded into that package's outcome instead of escaping.
pub struct PackageChecker<'a> {
    runtime: &'a dyn Runtime,
    repository: &'a str,
    bootstrap: Option<PackageName>,
    library: Option<PathBuf>,
}

impl<'a> PackageChecker<'a> {
    pub fn new(runtime: &'a dyn Runtime, repository: &'a str) -> Self {
        Self {
            runtime,
            repository,
            bootstrap: None,
            library: None,
        }
    }

    /// Tooling package installed unconditionally before the list is walked,
    /// whether or not it is already present.
    pub fn with_bootstrap(mut self, bootstrap: Option<PackageName>) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Install destination. Without it the interpreter picks the first
    /// writable entry of its own search path.
    pub fn with_library(mut self, library: Option<&Path>) -> Self {
        self.library = library.map(Path::to_path_buf);
        self
    }

    /// Run the full check, producing a report.
    pub fn run(
        &self,
        packages: &[PackageName],
        progress: &mut dyn FnMut(CheckProgress),
    ) -> CheckReport {
        let started_at = Utc::now();
        let timer = Instant::now();

        let outcome = self.run_inner(packages, progress);

        CheckReport {
            strategy: CheckStrategy::Sequential,
            outcome: outcome.0,
            packages: outcome.1,
            started_at,
            duration_ms: timer.elapsed().as_millis() as u64,
        }
    }

    fn run_inner(
        &self,
        packages: &[PackageName],
        progress: &mut dyn FnMut(CheckProgress),
    ) -> (CheckOutcome, Vec<PackageResult>) {
        let mut results = Vec::with_capacity(packages.len());

        if let Some(bootstrap) = &self.bootstrap {
            progress(CheckProgress::Bootstrap {
                package: bootstrap.clone(),
            });
            if let Err(error) = self.install(bootstrap) {
                warn!("bootstrap install of '{bootstrap}' failed: {error}");
                return (
                    CheckOutcome::BootstrapFailed {
                        message: error.to_string(),
                    },
                    results,
                );
            }
        }

        let total = packages.len();
        for (index, package) in packages.iter().enumerate() {
            progress(CheckProgress::Checking {
                package: package.clone(),
                index,
                total,
            });

            let outcome = match self.check_one(package) {
                Ok(outcome) => outcome,
                Err(error) => {
                    warn!("checking '{package}' failed: {error}");
                    PackageOutcome::Errored {
                        message: error.to_string(),
                    }
                }
            };

            let resolved = outcome.is_resolved();
            progress(CheckProgress::Resolved {
                package: package.clone(),
                outcome: outcome.clone(),
            });
            results.push(PackageResult {
                package: package.clone(),
                outcome,
            });

            if !resolved {
                warn!("package '{package}' could not be made loadable");
                return (
                    CheckOutcome::Unresolved {
                        packages: vec![package.clone()],
                    },
                    results,
                );
            }
        }

        (CheckOutcome::Satisfied, results)
    }

    /// Query, install if missing, re-query.
    fn check_one(&self, package: &PackageName) -> Result<PackageOutcome> {
        if self.is_loadable(package)? {
            debug!("'{package}' already loadable");
            return Ok(PackageOutcome::AlreadyLoadable);
        }

        debug!("'{package}' missing, installing from {}", self.repository);
        self.install(package)?;

        if self.is_loadable(package)? {
            Ok(PackageOutcome::Installed)
        } else {
            Ok(PackageOutcome::InstallFailed)
        }
    }

    fn is_loadable(&self, package: &PackageName) -> Result<bool> {
        let call = RuntimeCall::new("requireNamespace")
            .arg(package)
            .named_arg("quietly", true);
        self.runtime.call_bool(&call)
    }

    fn install(&self, package: &PackageName) -> Result<()> {
        let mut call = RuntimeCall::new("install.packages")
            .arg(package)
            .named_arg("repos", self.repository)
            .named_arg("dependencies", true);
        if let Some(library) = &self.library {
            call = call.named_arg("lib", library.to_string_lossy().as_ref());
        }
        self.runtime.call_unit(&call)
    }
}
