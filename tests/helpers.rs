//! Test utility functions for corral

use async_trait::async_trait;
use corral::core::error::{Error, Result};
use corral::env::EnvTool;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Fake environment manager with call counters
///
/// This is useful for:
/// - Fast, deterministic tests without subprocess overhead
/// - Pinning the install decision table (create/install call counts)
/// - Recording the exact argument vectors commands run with
/// - Simulating non-zero exits for fail-fast behavior
#[derive(Default)]
pub struct FakeEnvTool {
    state: Mutex<HashMap<String, EnvRecord>>,
    pub creates: AtomicUsize,
    pub installs: AtomicUsize,
    pub updates: AtomicUsize,
    pub runs: AtomicUsize,
    /// Every `run` invocation as `(env, args)` in call order.
    pub run_args: Mutex<Vec<(String, Vec<String>)>>,
    fail_on_command: Mutex<Option<String>>,
}

#[derive(Default)]
struct EnvRecord {
    exists: bool,
    installed: HashSet<String>,
}

impl FakeEnvTool {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Pre-seed an environment as already created, optionally with the
    /// project of the same name already installed.
    pub fn seed_env(self: &Arc<Self>, env: &str, installed: bool) -> Arc<Self> {
        let mut state = self.state.lock().unwrap();
        let record = state.entry(env.to_string()).or_default();
        record.exists = true;
        if installed {
            record.installed.insert(env.to_string());
        }
        drop(state);
        self.clone()
    }

    /// Make `run` fail with a non-zero exit whenever the first argument
    /// equals `command`.
    pub fn fail_on_command(self: &Arc<Self>, command: &str) -> Arc<Self> {
        *self.fail_on_command.lock().unwrap() = Some(command.to_string());
        self.clone()
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn install_count(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Recorded `(env, args)` pairs in call order.
    pub fn recorded_runs(&self) -> Vec<(String, Vec<String>)> {
        self.run_args.lock().unwrap().clone()
    }
}

#[async_trait]
impl EnvTool for FakeEnvTool {
    async fn exists(&self, env: &str) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .get(env)
            .is_some_and(|r| r.exists))
    }

    async fn contains(&self, env: &str, project: &str) -> Result<bool> {
        let state = self.state.lock().unwrap();
        match state.get(env) {
            Some(record) if record.exists => Ok(record.installed.contains(project)),
            _ => Err(Error::EnvironmentMissing {
                env: env.to_string(),
            }),
        }
    }

    async fn create(&self, env: &str) -> Result<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .unwrap()
            .entry(env.to_string())
            .or_default()
            .exists = true;
        Ok(())
    }

    async fn install(&self, env: &str, _project_path: &Path) -> Result<()> {
        self.installs.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        let record = state.entry(env.to_string()).or_default();
        // The environment names the owning project, so membership is
        // recorded under the env name.
        record.installed.insert(env.to_string());
        Ok(())
    }

    async fn update(&self, env: &str, _project_path: &Path) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        state.entry(env.to_string()).or_default();
        Ok(())
    }

    async fn run(&self, env: &str, args: &[String]) -> Result<String> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.run_args
            .lock()
            .unwrap()
            .push((env.to_string(), args.to_vec()));

        if let Some(command) = self.fail_on_command.lock().unwrap().as_deref() {
            if args.first().map(String::as_str) == Some(command) {
                return Err(Error::EnvironmentExecution {
                    env: env.to_string(),
                    exit_code: 1,
                    stderr: format!("command '{}' failed", command),
                });
            }
        }

        Ok(format!("ran {} in {}\n", args.join(" "), env))
    }
}

/// Write a project descriptor under `root/<name>` and return its path.
pub fn write_project(root: &Path, name: &str) -> std::path::PathBuf {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("corral.toml"),
        format!("[project]\nname = \"{}\"\n", name),
    )
    .unwrap();
    dir
}

/// Write a pipeline descriptor at `root` with the given steps and
/// registered script names.
pub fn write_pipeline(root: &Path, steps: &[&str], scripts: &[&str]) {
    let steps_toml = steps
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join(", ");
    let scripts_toml = scripts
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join(", ");
    std::fs::write(
        root.join("corral.toml"),
        format!(
            "[project]\nname = \"pipeline\"\n\n\
             [pipeline]\nsteps = [{}]\n\n\
             [runcfg]\nscripts = [{}]\n",
            steps_toml, scripts_toml
        ),
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_tool_tracks_lifecycle() {
        let tool = FakeEnvTool::new();
        assert!(!tool.exists("a").await.unwrap());

        tool.create("a").await.unwrap();
        assert!(tool.exists("a").await.unwrap());
        assert!(!tool.contains("a", "a").await.unwrap());

        tool.install("a", Path::new("/p/a")).await.unwrap();
        assert!(tool.contains("a", "a").await.unwrap());
        assert_eq!(tool.create_count(), 1);
        assert_eq!(tool.install_count(), 1);
    }

    #[tokio::test]
    async fn test_fake_tool_contains_requires_env() {
        let tool = FakeEnvTool::new();
        let err = tool.contains("missing", "missing").await.unwrap_err();
        assert!(matches!(err, Error::EnvironmentMissing { ref env } if env == "missing"));
    }

    #[tokio::test]
    async fn test_fake_tool_failing_command() {
        let tool = FakeEnvTool::new().seed_env("a", true).fail_on_command("boom");
        let err = tool
            .run("a", &["boom".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EnvironmentExecution { exit_code: 1, .. }));
        assert_eq!(tool.run_count(), 1);
    }
}
