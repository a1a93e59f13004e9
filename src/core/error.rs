//! Error taxonomy for descriptor loading, step resolution and environment
//! execution. Nothing here is retried; every error propagates to the
//! top-level runner unmodified.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving or running projects and pipelines.
#[derive(Debug, Error)]
pub enum Error {
    /// No descriptor file at the expected location. Raised at construction.
    #[error(
        "no descriptor file '{}' found at '{}'",
        crate::core::descriptor::DESCRIPTOR_FILE,
        .path.display()
    )]
    MissingDescriptor { path: PathBuf },

    /// The descriptor file exists but could not be read or parsed.
    #[error("failed to read descriptor '{}': {message}", .path.display())]
    DescriptorParse { path: PathBuf, message: String },

    /// A required table or key is absent from the descriptor.
    #[error("descriptor '{}' has no '{table}' table", .path.display())]
    MissingKey { table: String, path: PathBuf },

    /// A pipeline step string could not be split into
    /// `component:command[:subcommand]`.
    #[error("can't parse pipeline step '{step}'")]
    StepParse { step: String },

    /// An operation required the environment to exist first.
    #[error("environment '{env}' has not been created")]
    EnvironmentMissing { env: String },

    /// A command run inside an environment exited non-zero.
    #[error("command in environment '{env}' exited with code {exit_code}: {stderr}")]
    EnvironmentExecution {
        env: String,
        exit_code: i32,
        stderr: String,
    },

    /// The environment manager itself could not be invoked
    /// (spawn failure, undecodable output).
    #[error("environment tool error: {0}")]
    Tool(String),
}

/// Result type for corral operations.
pub type Result<T> = std::result::Result<T, Error>;
