//! Interpreter runtime seam.
//!
//! Everything that talks to the embedded statistical runtime goes through the
//! [`Runtime`] trait, so provisioning logic can be driven against a scripted
//! double in tests and against `Rscript` in production.

pub mod call;
pub mod fake;
pub mod rscript;

pub use call::{RValue, RuntimeCall};
pub use fake::FakeRuntime;
pub use rscript::RscriptRuntime;

use crate::error::Result;

/// Access to the embedded interpreter.
///
/// Single calls go through the typed `call_*` methods. Whole scripts go
/// through [`Runtime::eval`]. Implementations report an interpreter that
/// cannot be started as [`RuntimeUnreachable`](crate::LarderError::RuntimeUnreachable)
/// and a started call that fails as [`CallFailed`](crate::LarderError::CallFailed).
pub trait Runtime {
    /// Short description of the interpreter for logs, e.g. `Rscript --vanilla`.
    fn describe(&self) -> String;

    /// Evaluate a call whose result is a single logical value.
    fn call_bool(&self, call: &RuntimeCall) -> Result<bool>;

    /// Evaluate a call whose result is a single string.
    fn call_string(&self, call: &RuntimeCall) -> Result<String>;

    /// Evaluate a call whose result is a vector of strings.
    fn call_strings(&self, call: &RuntimeCall) -> Result<Vec<String>>;

    /// Evaluate a call for its side effect only.
    fn call_unit(&self, call: &RuntimeCall) -> Result<()>;

    /// Run a complete script and return its standard output.
    fn eval(&self, script: &str) -> Result<String>;
}
