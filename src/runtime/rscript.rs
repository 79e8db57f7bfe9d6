//! `Rscript`-backed runtime.

use crate::error::{LarderError, Result};
use crate::runtime::{Runtime, RuntimeCall};
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{debug, trace};

/// Default interpreter program name, resolved through `PATH`.
pub const DEFAULT_PROGRAM: &str = "Rscript";

/// Default interpreter arguments. `--vanilla` keeps every call free of site
/// and user profiles, so results depend only on the expression and the
/// installed libraries.
pub fn default_args() -> Vec<String> {
    vec!["--vanilla".to_string()]
}

/// Runtime that spawns a fresh `Rscript` process per call.
///
/// No interpreter state survives between calls; anything a later call depends
/// on must be on disk (installed packages) or in the environment.
#[derive(Debug, Clone)]
pub struct RscriptRuntime {
    program: String,
    args: Vec<String>,
}

/// Captured output of one interpreter process.
struct CallOutput {
    stdout: String,
    stderr: String,
}

impl RscriptRuntime {
    pub fn new(program: impl Into<String>, args: &[String]) -> Self {
        Self {
            program: program.into(),
            args: args.to_vec(),
        }
    }

    /// The interpreter executable this handle spawns.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run a single rendered expression via `-e`.
    fn run_expression(&self, routine: &str, expression: &str) -> Result<CallOutput> {
        trace!("evaluating: {expression}");
        let start = Instant::now();

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("-e")
            .arg(expression)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| LarderError::RuntimeUnreachable {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        debug!(
            "{routine} finished in {}ms (exit {:?})",
            start.elapsed().as_millis(),
            output.status.code()
        );

        self.collect(routine, output)
    }

    /// Run a whole script, fed through the interpreter's standard input.
    ///
    /// `-e` truncates long scripts, so multi-line programs go through stdin
    /// with `-` as the script argument.
    fn run_script(&self, routine: &str, script: &str) -> Result<CallOutput> {
        let start = Instant::now();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LarderError::RuntimeUnreachable {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(error) = stdin.write_all(script.as_bytes()) {
                // The interpreter may exit before consuming the script.
                trace!("interpreter closed stdin early: {error}");
            }
        }

        let output = child.wait_with_output()?;

        debug!(
            "{routine} finished in {}ms (exit {:?})",
            start.elapsed().as_millis(),
            output.status.code()
        );

        self.collect(routine, output)
    }

    fn collect(&self, routine: &str, output: std::process::Output) -> Result<CallOutput> {
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let message = if stderr.trim().is_empty() {
                match output.status.code() {
                    Some(code) => format!("exit status {code}"),
                    None => "terminated by signal".to_string(),
                }
            } else {
                stderr.trim().to_string()
            };
            return Err(LarderError::CallFailed {
                routine: routine.to_string(),
                message,
            });
        }

        if !stderr.trim().is_empty() {
            trace!("{routine} stderr: {}", stderr.trim());
        }

        Ok(CallOutput { stdout, stderr })
    }
}

impl Default for RscriptRuntime {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, &default_args())
    }
}

impl Runtime for RscriptRuntime {
    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    fn call_bool(&self, call: &RuntimeCall) -> Result<bool> {
        let output = self.run_expression(call.function(), &call.render_flag())?;
        match output.stdout.trim() {
            "TRUE" => Ok(true),
            "FALSE" => Ok(false),
            other => Err(LarderError::MalformedResult {
                routine: call.function().to_string(),
                expected: "TRUE or FALSE",
                output: other.to_string(),
            }),
        }
    }

    fn call_string(&self, call: &RuntimeCall) -> Result<String> {
        let output = self.run_expression(call.function(), &call.render_lines())?;
        let trimmed = output.stdout.trim();
        if trimmed.is_empty() || trimmed.contains('\n') {
            return Err(LarderError::MalformedResult {
                routine: call.function().to_string(),
                expected: "a single value",
                output: output.stdout.clone(),
            });
        }
        Ok(trimmed.to_string())
    }

    fn call_strings(&self, call: &RuntimeCall) -> Result<Vec<String>> {
        let output = self.run_expression(call.function(), &call.render_lines())?;
        Ok(output
            .stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.to_string())
            .collect())
    }

    fn call_unit(&self, call: &RuntimeCall) -> Result<()> {
        let output = self.run_expression(call.function(), &call.render_invisible())?;
        if !output.stderr.trim().is_empty() {
            debug!("{} reported: {}", call.function(), output.stderr.trim());
        }
        Ok(())
    }

    fn eval(&self, script: &str) -> Result<String> {
        let output = self.run_script("script evaluation", script)?;
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests drive the process plumbing with `sh` standing in for the
    // interpreter so they run without the statistical runtime installed.
    fn stub(script: &str) -> RscriptRuntime {
        RscriptRuntime::new("sh", &["-c".to_string(), script.to_string()])
    }

    #[test]
    fn call_bool_parses_true_and_false() {
        let runtime = stub("printf TRUE");
        let call = RuntimeCall::new("requireNamespace").arg("zoo");
        assert!(runtime.call_bool(&call).unwrap());

        let runtime = stub("printf FALSE");
        assert!(!runtime.call_bool(&call).unwrap());
    }

    #[test]
    fn call_bool_rejects_unexpected_output() {
        let runtime = stub("printf maybe");
        let call = RuntimeCall::new("requireNamespace").arg("zoo");
        let error = runtime.call_bool(&call).unwrap_err();
        assert!(matches!(error, LarderError::MalformedResult { .. }));
    }

    #[test]
    fn call_string_requires_exactly_one_line() {
        let call = RuntimeCall::new("as.character").arg(RuntimeCall::new("getRversion"));

        let runtime = stub("printf '4.3.2\\n'");
        assert_eq!(runtime.call_string(&call).unwrap(), "4.3.2");

        let runtime = stub("printf 'a\\nb\\n'");
        assert!(runtime.call_string(&call).is_err());

        let runtime = stub("printf ''");
        assert!(runtime.call_string(&call).is_err());
    }

    #[test]
    fn call_strings_splits_lines_and_drops_blanks() {
        let runtime = stub("printf '/usr/lib/R/library\\n\\n/home/u/Library/R\\n'");
        let call = RuntimeCall::new(".libPaths");
        let paths = runtime.call_strings(&call).unwrap();
        assert_eq!(paths, vec!["/usr/lib/R/library", "/home/u/Library/R"]);
    }

    #[test]
    fn nonzero_exit_becomes_call_failed_with_stderr() {
        let runtime = stub("echo 'could not resolve package' >&2; exit 1");
        let call = RuntimeCall::new("install.packages").arg("forecast");
        let error = runtime.call_unit(&call).unwrap_err();
        match error {
            LarderError::CallFailed { routine, message } => {
                assert_eq!(routine, "install.packages");
                assert!(message.contains("could not resolve package"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_program_becomes_runtime_unreachable() {
        let runtime = RscriptRuntime::new("larder-test-no-such-interpreter", &[]);
        let call = RuntimeCall::new(".libPaths");
        let error = runtime.call_strings(&call).unwrap_err();
        match error {
            LarderError::RuntimeUnreachable { program, .. } => {
                assert_eq!(program, "larder-test-no-such-interpreter");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn eval_pipes_the_script_through_stdin() {
        let runtime = stub("tr 'a-z' 'A-Z'");
        let output = runtime.eval("quiet script\n").unwrap();
        assert_eq!(output, "QUIET SCRIPT\n");
    }

    #[test]
    fn describe_includes_program_and_args() {
        let runtime = RscriptRuntime::default();
        assert_eq!(runtime.describe(), "Rscript --vanilla");
    }
}
