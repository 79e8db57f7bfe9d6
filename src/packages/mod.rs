//! Package verification and repair.
//!
//! Two interchangeable strategies walk the declared package list:
//! [`PackageChecker`] checks and repairs one package at a time and stops at
//! the first one it cannot resolve; [`BatchChecker`] hands the whole list to
//! the interpreter in a single evaluation and reports in aggregate. Both
//! produce a [`CheckReport`].

pub mod batch;
pub mod checker;
pub mod name;
pub mod status;

pub use batch::BatchChecker;
pub use checker::{CheckProgress, PackageChecker};
pub use name::PackageName;
pub use status::{CheckOutcome, CheckReport, CheckStrategy, PackageOutcome, PackageResult};
