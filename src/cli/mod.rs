//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{BuildCommand, RunCommand, ValidateCommand};

/// Multi-project pipeline runner with isolated environments
#[derive(Debug, Parser, Clone)]
#[command(name = "corral")]
#[command(version = "0.1.0")]
#[command(about = "Run multi-project pipelines in isolated environments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to write logs to instead of stdout
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    /// Path to the environment-manager executable
    #[arg(long, global = true)]
    pub env_tool: Option<String>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a pipeline
    Run(RunCommand),

    /// Build a single project's environment
    Build(BuildCommand),

    /// Validate a project or pipeline descriptor
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
