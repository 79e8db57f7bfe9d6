//! Start-clean handling for the user library.

use crate::error::{LarderError, Result};
use crate::library::LibrarySelection;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Make a user-scoped library directory exist, empty when `clean` is set.
///
/// An existing directory is recursively deleted and recreated so stale
/// package versions from prior runs never shadow a fresh install. With
/// `clean` off an existing directory is left as-is. System-scoped
/// selections are never touched and return immediately.
pub fn prepare_user_library(selection: &LibrarySelection, clean: bool) -> Result<()> {
    if !selection.is_user_scoped() {
        debug!(
            "system library {} left untouched",
            selection.path.display()
        );
        return Ok(());
    }

    let path = &selection.path;
    if path.exists() {
        if !clean {
            debug!("keeping existing user library {}", path.display());
            return Ok(());
        }
        info!("recreating user library {}", path.display());
        fs::remove_dir_all(path).map_err(|e| unusable(path, &e))?;
    } else {
        info!("creating user library {}", path.display());
    }

    fs::create_dir_all(path).map_err(|e| unusable(path, &e))
}

fn unusable(path: &Path, error: &std::io::Error) -> LarderError {
    LarderError::LibraryUnusable {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
