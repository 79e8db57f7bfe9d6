//! Scripted runtime for tests.
//!
//! Shipped in the library (not behind `cfg(test)`) so downstream users can
//! drive provisioning flows without a real interpreter, the same way the
//! mock terminal in [`crate::ui`] stands in for a real one.

use crate::error::{LarderError, Result};
use crate::runtime::{Runtime, RuntimeCall};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};

/// In-memory stand-in for an interpreter.
///
/// The fake models the interpreter's package state as plain sets: a package
/// is loadable when scripted as such or after a successful install, installs
/// succeed only for packages scripted as installable, and any call touching
/// an `erroring` package fails. Every call is recorded in rendered form for
/// assertions.
#[derive(Debug, Default)]
pub struct FakeRuntime {
    state: RefCell<State>,
}

#[derive(Debug, Default)]
struct State {
    loadable: HashSet<String>,
    installable: HashSet<String>,
    erroring: HashSet<String>,
    library_paths: Vec<String>,
    version: String,
    home: String,
    unreachable: bool,
    eval_outputs: VecDeque<std::result::Result<String, String>>,
    calls: Vec<String>,
    eval_scripts: Vec<String>,
    install_count: usize,
}

impl FakeRuntime {
    pub fn new() -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.borrow_mut();
            state.version = "4.3.2".to_string();
            state.home = "/usr/lib/R".to_string();
        }
        fake
    }

    /// Packages that load without any install.
    pub fn with_loadable(self, packages: &[&str]) -> Self {
        {
            let mut state = self.state.borrow_mut();
            for package in packages {
                state.loadable.insert((*package).to_string());
            }
        }
        self
    }

    /// Packages that become loadable once installed.
    pub fn with_installable(self, packages: &[&str]) -> Self {
        {
            let mut state = self.state.borrow_mut();
            for package in packages {
                state.installable.insert((*package).to_string());
            }
        }
        self
    }

    /// Packages whose query or install raises an interpreter error.
    pub fn with_erroring(self, packages: &[&str]) -> Self {
        {
            let mut state = self.state.borrow_mut();
            for package in packages {
                state.erroring.insert((*package).to_string());
            }
        }
        self
    }

    /// Library search paths reported by the interpreter.
    pub fn with_library_paths(self, paths: &[&str]) -> Self {
        self.state.borrow_mut().library_paths = paths.iter().map(|p| (*p).to_string()).collect();
        self
    }

    /// Interpreter version string.
    pub fn with_version(self, version: &str) -> Self {
        self.state.borrow_mut().version = version.to_string();
        self
    }

    /// Interpreter home directory.
    pub fn with_home(self, home: &str) -> Self {
        self.state.borrow_mut().home = home.to_string();
        self
    }

    /// Make every call fail as if the interpreter binary were missing.
    pub fn with_unreachable(self) -> Self {
        self.state.borrow_mut().unreachable = true;
        self
    }

    /// Queue a scripted stdout for the next [`Runtime::eval`].
    pub fn with_eval_output(self, output: &str) -> Self {
        self.state
            .borrow_mut()
            .eval_outputs
            .push_back(Ok(output.to_string()));
        self
    }

    /// Queue a scripted failure for the next [`Runtime::eval`].
    pub fn with_eval_failure(self, message: &str) -> Self {
        self.state
            .borrow_mut()
            .eval_outputs
            .push_back(Err(message.to_string()));
        self
    }

    /// Rendered form of every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// Whether any recorded call contains the given fragment.
    pub fn was_called(&self, fragment: &str) -> bool {
        self.state
            .borrow()
            .calls
            .iter()
            .any(|c| c.contains(fragment))
    }

    /// Number of install calls made so far.
    pub fn install_count(&self) -> usize {
        self.state.borrow().install_count
    }

    /// Scripts passed to [`Runtime::eval`], in order.
    pub fn eval_scripts(&self) -> Vec<String> {
        self.state.borrow().eval_scripts.clone()
    }

    fn guard(&self, call: &RuntimeCall) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call.render());
        if state.unreachable {
            return Err(LarderError::RuntimeUnreachable {
                program: "fake interpreter".to_string(),
                message: "scripted as unreachable".to_string(),
            });
        }
        if let Some(package) = call.first_string_arg() {
            if state.erroring.contains(package) {
                return Err(LarderError::CallFailed {
                    routine: call.function().to_string(),
                    message: format!("scripted error for '{package}'"),
                });
            }
        }
        Ok(())
    }

    fn unknown(&self, call: &RuntimeCall) -> LarderError {
        LarderError::CallFailed {
            routine: call.function().to_string(),
            message: "fake runtime does not script this routine".to_string(),
        }
    }
}

impl Runtime for FakeRuntime {
    fn describe(&self) -> String {
        "fake interpreter".to_string()
    }

    fn call_bool(&self, call: &RuntimeCall) -> Result<bool> {
        self.guard(call)?;
        match call.function() {
            "requireNamespace" => {
                let package = call.first_string_arg().unwrap_or_default();
                Ok(self.state.borrow().loadable.contains(package))
            }
            _ => Err(self.unknown(call)),
        }
    }

    fn call_string(&self, call: &RuntimeCall) -> Result<String> {
        self.guard(call)?;
        match call.function() {
            "as.character" => Ok(self.state.borrow().version.clone()),
            "R.home" => Ok(self.state.borrow().home.clone()),
            _ => Err(self.unknown(call)),
        }
    }

    fn call_strings(&self, call: &RuntimeCall) -> Result<Vec<String>> {
        self.guard(call)?;
        match call.function() {
            ".libPaths" => Ok(self.state.borrow().library_paths.clone()),
            _ => Err(self.unknown(call)),
        }
    }

    fn call_unit(&self, call: &RuntimeCall) -> Result<()> {
        self.guard(call)?;
        match call.function() {
            "install.packages" => {
                let mut state = self.state.borrow_mut();
                state.install_count += 1;
                if let Some(package) = call.first_string_arg() {
                    if state.installable.contains(package) {
                        let package = package.to_string();
                        state.loadable.insert(package);
                    }
                }
                Ok(())
            }
            _ => Err(self.unknown(call)),
        }
    }

    fn eval(&self, script: &str) -> Result<String> {
        let mut state = self.state.borrow_mut();
        state.eval_scripts.push(script.to_string());
        if state.unreachable {
            return Err(LarderError::RuntimeUnreachable {
                program: "fake interpreter".to_string(),
                message: "scripted as unreachable".to_string(),
            });
        }
        match state.eval_outputs.pop_front() {
            Some(Ok(output)) => Ok(output),
            Some(Err(message)) => Err(LarderError::CallFailed {
                routine: "script evaluation".to_string(),
                message,
            }),
            None => Err(LarderError::CallFailed {
                routine: "script evaluation".to_string(),
                message: "no scripted output queued".to_string(),
            }),
        }
    }
}
