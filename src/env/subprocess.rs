//! Environment manager subprocess client.
//!
//! Shells out to the external manager CLI (`envman` by default) and
//! interprets nothing beyond exit codes and captured streams:
//!
//! - `envman list` - provisioned environment names, one per line
//! - `envman show <env>` - installed project names, one per line
//! - `envman create <env>`
//! - `envman install <env> <project-path>`
//! - `envman update <env> <project-path>`
//! - `envman exec <env> -- <args...>`

use crate::core::error::{Error, Result};
use crate::env::{EnvTool, EnvToolConfig};
use async_trait::async_trait;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::{debug, warn};

const DEFAULT_PROGRAM: &str = "envman";

/// Client that drives the environment manager as a subprocess.
#[derive(Debug, Clone)]
pub struct SubprocessEnvTool {
    program: String,
}

impl SubprocessEnvTool {
    pub fn new(config: EnvToolConfig) -> Self {
        let program = config.program.unwrap_or_else(|| DEFAULT_PROGRAM.to_string());
        Self { program }
    }

    #[cfg(test)]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Spawn the manager with `args`, each as its own token, and wait.
    async fn invoke(&self, env: &str, args: &[String]) -> Result<Output> {
        debug!("invoking {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::Tool(format!("failed to spawn '{}': {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            warn!("{} exited with code {}: {}", self.program, exit_code, stderr);
            return Err(Error::EnvironmentExecution {
                env: env.to_string(),
                exit_code,
                stderr,
            });
        }

        Ok(output)
    }

    fn decode(output: Output) -> Result<String> {
        String::from_utf8(output.stdout)
            .map_err(|e| Error::Tool(format!("failed to decode tool output: {}", e)))
    }

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }
}

#[async_trait]
impl EnvTool for SubprocessEnvTool {
    async fn exists(&self, env: &str) -> Result<bool> {
        let output = self.invoke(env, &Self::args(&["list"])).await?;
        let stdout = Self::decode(output)?;
        Ok(stdout.lines().any(|line| line.trim() == env))
    }

    async fn contains(&self, env: &str, project: &str) -> Result<bool> {
        if !self.exists(env).await? {
            return Err(Error::EnvironmentMissing {
                env: env.to_string(),
            });
        }
        let output = self.invoke(env, &Self::args(&["show", env])).await?;
        let stdout = Self::decode(output)?;
        Ok(stdout.lines().any(|line| line.trim() == project))
    }

    async fn create(&self, env: &str) -> Result<()> {
        self.invoke(env, &Self::args(&["create", env])).await?;
        Ok(())
    }

    async fn install(&self, env: &str, project_path: &Path) -> Result<()> {
        let path = project_path.to_string_lossy();
        let args = Self::args(&["install", env, path.as_ref()]);
        self.invoke(env, &args).await?;
        Ok(())
    }

    async fn update(&self, env: &str, project_path: &Path) -> Result<()> {
        let path = project_path.to_string_lossy();
        let args = Self::args(&["update", env, path.as_ref()]);
        self.invoke(env, &args).await?;
        Ok(())
    }

    async fn run(&self, env: &str, args: &[String]) -> Result<String> {
        let mut full = Self::args(&["exec", env, "--"]);
        full.extend(args.iter().cloned());
        let output = self.invoke(env, &full).await?;
        Self::decode(output)
    }
}
