//! Library search path selection.

use crate::error::{LarderError, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// Who owns the selected library directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryScope {
    /// A per-user library root. Safe to create and recreate.
    User,
    /// The interpreter's own install tree. Never created, never cleaned.
    System,
}

/// The install destination chosen for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibrarySelection {
    pub path: PathBuf,
    pub scope: LibraryScope,
}

impl LibrarySelection {
    /// A user-scoped selection, e.g. from an explicit config override.
    pub fn user(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            scope: LibraryScope::User,
        }
    }

    pub fn is_user_scoped(&self) -> bool {
        self.scope == LibraryScope::User
    }
}

/// Pick the install destination from the interpreter's search paths.
///
/// The first path containing `marker` wins and is treated as user-scoped.
/// With no match the first entry is the system fallback. An empty search
/// path list is a malformed answer from the interpreter, not a usable
/// configuration.
pub fn select_library(paths: &[String], marker: &str) -> Result<LibrarySelection> {
    if paths.is_empty() {
        return Err(LarderError::MalformedResult {
            routine: ".libPaths".to_string(),
            expected: "at least one search path",
            output: String::new(),
        });
    }

    if let Some(path) = paths.iter().find(|p| p.contains(marker)) {
        debug!("selected user library {path} (marker {marker:?})");
        return Ok(LibrarySelection {
            path: PathBuf::from(path),
            scope: LibraryScope::User,
        });
    }

    debug!("no user-scoped search path, falling back to {}", paths[0]);
    Ok(LibrarySelection {
        path: PathBuf::from(&paths[0]),
        scope: LibraryScope::System,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|p| (*p).to_string()).collect()
    }

    #[test]
    fn user_scoped_marker_wins_over_first_position() {
        let selection = select_library(
            &paths(&["/sys/R/library", "/home/user/Library/R/lib"]),
            "Library",
        )
        .unwrap();
        assert_eq!(selection.path, PathBuf::from("/home/user/Library/R/lib"));
        assert_eq!(selection.scope, LibraryScope::User);
    }

    #[test]
    fn first_entry_is_the_system_fallback() {
        let selection = select_library(&paths(&["/sys/R/library"]), "Library").unwrap();
        assert_eq!(selection.path, PathBuf::from("/sys/R/library"));
        assert_eq!(selection.scope, LibraryScope::System);
    }

    #[test]
    fn fallback_keeps_search_order() {
        let selection =
            select_library(&paths(&["/opt/R/site-library", "/usr/lib/R/library"]), "Library")
                .unwrap();
        assert_eq!(selection.path, PathBuf::from("/opt/R/site-library"));
        assert_eq!(selection.scope, LibraryScope::System);
    }

    #[test]
    fn earliest_matching_path_is_selected() {
        let selection = select_library(
            &paths(&[
                "/sys/R/library",
                "/home/a/Library/R",
                "/home/b/Library/R",
            ]),
            "Library",
        )
        .unwrap();
        assert_eq!(selection.path, PathBuf::from("/home/a/Library/R"));
    }

    #[test]
    fn empty_search_paths_are_malformed() {
        let error = select_library(&[], "Library").unwrap_err();
        match error {
            LarderError::MalformedResult { routine, .. } => assert_eq!(routine, ".libPaths"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn custom_marker_is_honored() {
        let selection =
            select_library(&paths(&["/sys/R/library", "/data/r-user-libs"]), "r-user").unwrap();
        assert_eq!(selection.path, PathBuf::from("/data/r-user-libs"));
        assert!(selection.is_user_scoped());
    }
}
