//! Runtime environment probe.
//!
//! Version and home directory are observability data only; nothing branches
//! on them. The library search paths are the one probed value that drives
//! control flow, via [`crate::library::select_library`].

use crate::error::Result;
use crate::runtime::{Runtime, RuntimeCall};
use regex::Regex;
use serde::Serialize;
use tracing::info;

/// What the interpreter reported about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeEnvironment {
    /// Condensed version, e.g. `4.3.2`.
    pub version: String,
    /// The interpreter's home directory.
    pub home: String,
    /// Library search paths, in the interpreter's own order.
    pub library_paths: Vec<String>,
}

/// Query version, home, and search paths through the typed call interface.
///
/// The first call doubles as the reachability check: an interpreter that
/// cannot be started surfaces here as `RuntimeUnreachable`.
pub fn probe_environment(runtime: &dyn Runtime) -> Result<RuntimeEnvironment> {
    let version_call = RuntimeCall::new("as.character").arg(RuntimeCall::new("getRversion"));
    let raw_version = runtime.call_string(&version_call)?;
    let version = extract_version(&raw_version).unwrap_or(raw_version);

    let home = runtime.call_string(&RuntimeCall::new("R.home"))?;
    let library_paths = runtime.call_strings(&RuntimeCall::new(".libPaths"))?;

    info!(
        "runtime {} version {} home {}",
        runtime.describe(),
        version,
        home
    );

    Ok(RuntimeEnvironment {
        version,
        home,
        library_paths,
    })
}

/// Condense a version report to its dotted numeric core.
fn extract_version(output: &str) -> Option<String> {
    let patterns = [r"(\d+\.\d+\.\d+)", r"(\d+\.\d+)"];

    for pattern in &patterns {
        if let Ok(re) = Regex::new(pattern) {
            if let Some(caps) = re.captures(output) {
                if let Some(m) = caps.get(1) {
                    return Some(m.as_str().to_string());
                }
            }
        }
    }

    None
}
