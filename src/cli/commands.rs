//! CLI command definitions

use clap::Args;

/// Run a pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to the pipeline's root directory
    pub pipeline: String,

    /// Print each step's captured output
    #[arg(long)]
    pub show_output: bool,
}

/// Build a single project's environment
#[derive(Debug, Args, Clone)]
pub struct BuildCommand {
    /// Path to the project's root directory
    pub project: String,

    /// Re-install even if the project is already installed
    #[arg(short, long)]
    pub force: bool,
}

/// Validate a project or pipeline descriptor
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to the project's root directory
    pub path: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
