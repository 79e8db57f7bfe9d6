//! Larder - R package environment provisioning.
//!
//! Larder drives an installed R interpreter to make sure a project's
//! package list is installed and loadable, replacing the ad-hoc setup
//! scripts that usually do this by hand.
//!
//! # Modules
//!
//! - [`assets`] - Embedded interpreter scripts and config templates
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and defaults
//! - [`error`] - Error types and result aliases
//! - [`library`] - Library search path selection and preparation
//! - [`packages`] - Package names, check strategies, and reports
//! - [`repository`] - Repository reachability probe
//! - [`runtime`] - The R interpreter interface and implementations
//! - [`session`] - Provisioning sessions tying it all together
//! - [`ui`] - Spinners, prompts, and terminal output
//!
//! # Example
//!
//! ```no_run
//! use larder::config::Config;
//! use larder::runtime::RscriptRuntime;
//! use larder::session::Session;
//!
//! let mut session = Session::new(Config::default(), RscriptRuntime::default());
//! if session.initialize() {
//!     println!("all packages loadable");
//! }
//! ```

pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod library;
pub mod packages;
pub mod repository;
pub mod runtime;
pub mod session;
pub mod ui;

pub use error::{LarderError, Result};
pub use session::Session;
