//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::packages::CheckStrategy;

/// Larder - R package environment provisioning.
#[derive(Debug, Parser)]
#[command(name = "larder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides the discovered .larder.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Package repository URL (overrides the configured mirror)
    #[arg(short, long, global = true, env = "LARDER_REPOSITORY")]
    pub repository: Option<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Discover the R environment, prepare the library, and install
    /// missing packages (default if no command specified)
    Setup(SetupArgs),

    /// Check the package list and install what is missing, without
    /// touching the library layout
    Check(CheckArgs),

    /// Show the R environment, configuration, and repository status
    Status(StatusArgs),

    /// Write a starter .larder.yml for a project
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `setup` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetupArgs {
    /// Answer yes to all prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Probe the repository before installing anything
    #[arg(long)]
    pub preflight: bool,

    /// Keep the existing user library instead of starting clean
    #[arg(long)]
    pub no_clean: bool,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Packages to check (defaults to the configured list)
    pub packages: Vec<String>,

    /// Check strategy: sequential or batch
    #[arg(short, long)]
    pub strategy: Option<CheckStrategy>,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
