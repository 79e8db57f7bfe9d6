//! Fixed interpreter scripts and config templates embedded at compile time.

use crate::error::{LarderError, Result};
use include_dir::{include_dir, Dir};

static ASSETS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

fn asset(name: &str) -> Result<&'static str> {
    let file = ASSETS_DIR
        .get_file(name)
        .ok_or_else(|| LarderError::ConfigNotFound {
            path: format!("assets/{name}").into(),
        })?;

    file.contents_utf8()
        .ok_or_else(|| LarderError::ConfigParseError {
            path: format!("assets/{name}").into(),
            message: "Invalid UTF-8".to_string(),
        })
}

/// The version-controlled helper routines used by the batch check strategy.
pub fn batch_helpers() -> Result<&'static str> {
    asset("helpers.R")
}

/// Starter configuration written by `larder init`.
pub fn starter_config() -> Result<&'static str> {
    asset("init.yml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_helpers_define_the_entry_function() {
        let script = batch_helpers().unwrap();
        assert!(script.contains("larder.ensure <- function(packages, repos)"));
        assert!(script.contains("larder:result"));
    }

    #[test]
    fn starter_config_lists_defaults() {
        let config = starter_config().unwrap();
        assert!(config.contains("packages:"));
        assert!(config.contains("https://cloud.r-project.org/"));
    }

    #[test]
    fn missing_assets_are_reported_by_path() {
        let error = asset("nope.R").unwrap_err();
        assert!(error.to_string().contains("assets/nope.R"));
    }
}
