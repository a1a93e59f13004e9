//! Environment management for projects.
//!
//! An [`Environment`] is an isolated, named runtime context into which one
//! project's dependencies are installed and inside which its commands
//! execute. Provisioning is delegated to an external environment-manager
//! CLI behind the narrow [`EnvTool`] capability trait, so tests can
//! substitute a fake.

pub mod subprocess;

use crate::core::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use subprocess::SubprocessEnvTool;

/// Trait for the external environment manager - allows for different
/// implementations.
///
/// `contains` requires the environment to exist; asking about membership in
/// an absent environment fails with
/// [`Error::EnvironmentMissing`](crate::core::error::Error::EnvironmentMissing).
#[async_trait]
pub trait EnvTool: Send + Sync {
    /// Whether the named environment has been provisioned. Side-effect free.
    async fn exists(&self, env: &str) -> Result<bool>;

    /// Whether `project` is currently installed into the environment.
    async fn contains(&self, env: &str, project: &str) -> Result<bool>;

    /// Provision a new empty environment. Callers guard with `exists`.
    async fn create(&self, env: &str) -> Result<()>;

    /// Install (or re-install) the project at `project_path` into the
    /// environment. May be slow; treated as blocking.
    async fn install(&self, env: &str, project_path: &Path) -> Result<()>;

    /// Re-sync an already-installed project to its latest dependencies.
    /// Distinct from `install` so callers can choose either on re-build.
    async fn update(&self, env: &str, project_path: &Path) -> Result<()>;

    /// Execute a command inside the environment, each element of `args`
    /// passed as a single token. Returns captured stdout.
    async fn run(&self, env: &str, args: &[String]) -> Result<String>;
}

/// Configuration for the environment-manager client.
#[derive(Debug, Clone)]
pub struct EnvToolConfig {
    /// Path to the manager executable. Defaults to `envman` on PATH,
    /// or the `CORRAL_ENV_TOOL` environment variable when set.
    pub program: Option<String>,
}

impl Default for EnvToolConfig {
    fn default() -> Self {
        Self {
            program: std::env::var("CORRAL_ENV_TOOL").ok(),
        }
    }
}

impl EnvToolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: String) -> Self {
        self.program = Some(program);
        self
    }
}

/// One project's environment: a name bound to the owning project's path,
/// with all operations delegated to the shared [`EnvTool`].
#[derive(Clone)]
pub struct Environment {
    name: String,
    project_path: PathBuf,
    tool: Arc<dyn EnvTool>,
}

impl Environment {
    /// Bind an environment named after the owning project.
    pub fn new(name: &str, project_path: &Path, tool: Arc<dyn EnvTool>) -> Self {
        Self {
            name: name.to_string(),
            project_path: project_path.to_path_buf(),
            tool,
        }
    }

    /// The environment's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the underlying environment has been created. Side-effect free.
    pub async fn exists(&self) -> Result<bool> {
        self.tool.exists(&self.name).await
    }

    /// Whether `project` is installed here. Fails if the environment does
    /// not exist.
    pub async fn contains(&self, project: &str) -> Result<bool> {
        self.tool.contains(&self.name, project).await
    }

    /// Provision the environment.
    pub async fn create(&self) -> Result<()> {
        self.tool.create(&self.name).await
    }

    /// Install the owning project into the environment.
    pub async fn install(&self) -> Result<()> {
        self.tool.install(&self.name, &self.project_path).await
    }

    /// Re-sync the owning project's dependencies.
    pub async fn update(&self) -> Result<()> {
        self.tool.update(&self.name, &self.project_path).await
    }

    /// Run a command inside the environment, returning captured stdout.
    pub async fn run(&self, args: &[String]) -> Result<String> {
        self.tool.run(&self.name, args).await
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("name", &self.name)
            .field("project_path", &self.project_path)
            .finish()
    }
}
