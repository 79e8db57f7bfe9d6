//! Error types for larder operations.
//!
//! This module defines [`LarderError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `LarderError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `LarderError::Other`) for unexpected errors
//! - Errors never escape the boolean entry points (`Session::initialize`,
//!   `Session::ensure_packages`); they are logged there and folded into the
//!   returned flag

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for larder operations.
#[derive(Debug, Error)]
pub enum LarderError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// The R interpreter could not be reached at all.
    #[error("R runtime unreachable ({program}): {message}")]
    RuntimeUnreachable { program: String, message: String },

    /// A routine invoked in the runtime reported an error.
    #[error("Runtime call '{routine}' failed: {message}")]
    CallFailed { routine: String, message: String },

    /// The runtime answered a query with an unexpected shape.
    #[error("Runtime call '{routine}' returned malformed {expected}: {output:?}")]
    MalformedResult {
        routine: String,
        expected: &'static str,
        output: String,
    },

    /// The selected library directory cannot be created or cleaned.
    #[error("Library path {path} unusable: {message}")]
    LibraryUnusable { path: PathBuf, message: String },

    /// A package name violates the R naming rule and is refused before it
    /// can reach a rendered expression.
    #[error("Invalid package name: {name:?}")]
    InvalidPackageName { name: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for larder operations.
pub type Result<T> = std::result::Result<T, LarderError>;
