//! Output verbosity mode.

use std::str::FromStr;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show all output including per-package detail.
    Verbose,
    /// Show progress and status only.
    #[default]
    Normal,
    /// Show nothing except errors and the final status.
    Quiet,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl OutputMode {
    /// Check if this mode shows per-package detail.
    pub fn shows_detail(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_from_str() {
        assert_eq!("verbose".parse::<OutputMode>(), Ok(OutputMode::Verbose));
        assert_eq!("QUIET".parse::<OutputMode>(), Ok(OutputMode::Quiet));
        assert!("invalid".parse::<OutputMode>().is_err());
    }

    #[test]
    fn output_mode_shows_detail() {
        assert!(OutputMode::Verbose.shows_detail());
        assert!(!OutputMode::Normal.shows_detail());
        assert!(!OutputMode::Quiet.shows_detail());
    }

    #[test]
    fn output_mode_shows_spinners() {
        assert!(OutputMode::Verbose.shows_spinners());
        assert!(OutputMode::Normal.shows_spinners());
        assert!(!OutputMode::Quiet.shows_spinners());
    }

    #[test]
    fn output_mode_shows_status() {
        assert!(OutputMode::Normal.shows_status());
        assert!(!OutputMode::Quiet.shows_status());
    }

    #[test]
    fn output_mode_default() {
        assert_eq!(OutputMode::default(), OutputMode::Normal);
    }
}
