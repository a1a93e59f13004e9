//! Projects: a filesystem root bound to its descriptor and its environment.

use crate::core::descriptor::Descriptor;
use crate::core::error::Result;
use crate::core::events::{Event, EventSink};
use crate::env::{EnvTool, Environment};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Where a project's environment currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvState {
    /// The environment has not been created.
    Absent,
    /// The environment exists but the project is not installed into it.
    NotInstalled,
    /// The environment exists and contains the project.
    Installed,
}

/// What `Project::install` should do for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAction {
    CreateAndInstall,
    Install,
    Reinstall,
    Skip,
}

/// The install precedence chain as an explicit decision table.
/// First matching row wins; the tool-level install runs at most once.
pub fn plan_install(state: EnvState, force: bool) -> InstallAction {
    match (state, force) {
        (EnvState::Absent, _) => InstallAction::CreateAndInstall,
        (EnvState::NotInstalled, _) => InstallAction::Install,
        (EnvState::Installed, true) => InstallAction::Reinstall,
        (EnvState::Installed, false) => InstallAction::Skip,
    }
}

/// An individual project: a filesystem location, its descriptor and the
/// environment its commands run in. The environment is bound eagerly at
/// construction but may not have been provisioned on disk yet.
#[derive(Clone)]
pub struct Project {
    path: PathBuf,
    descriptor: Descriptor,
    name: String,
    env: Environment,
    sink: EventSink,
}

impl Project {
    /// Open the project rooted at `path`.
    ///
    /// Fails if there is no descriptor file at `path` or the descriptor has
    /// no `[project].name`.
    pub fn open(path: &Path, tool: Arc<dyn EnvTool>, sink: EventSink) -> Result<Self> {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let descriptor = Descriptor::load(&path)?;
        let name = descriptor.project_name()?;
        let env = Environment::new(&name, &path, tool);
        Ok(Self {
            path,
            descriptor,
            name,
            env,
            sink,
        })
    }

    /// The project's absolute filesystem root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The project name, fixed at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The project's descriptor.
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// The environment bound to this project.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Observe the environment's current state.
    ///
    /// `contains` is only asked once `exists` is true, so the membership
    /// precondition always holds.
    async fn env_state(&self) -> Result<EnvState> {
        if !self.env.exists().await? {
            return Ok(EnvState::Absent);
        }
        if self.env.contains(&self.name).await? {
            Ok(EnvState::Installed)
        } else {
            Ok(EnvState::NotInstalled)
        }
    }

    /// Install this project into its environment, creating the environment
    /// first if necessary.
    ///
    /// With `force`, an already-installed project is re-installed; without
    /// it, that case is a no-op. Callers wanting a dependency re-sync
    /// instead of a fresh install use [`Project::update`].
    pub async fn install(&self, force: bool) -> Result<()> {
        let state = self.env_state().await?;
        let action = plan_install(state, force);
        debug!(
            "install plan for '{}': state {:?}, force {} -> {:?}",
            self.name, state, force, action
        );

        match action {
            InstallAction::CreateAndInstall => {
                self.env.create().await?;
                (self.sink)(Event::EnvironmentCreated {
                    env: self.env.name().to_string(),
                });
                self.emit_installing();
                self.env.install().await
            }
            InstallAction::Install => {
                self.emit_installing();
                self.env.install().await
            }
            InstallAction::Reinstall => {
                info!(
                    "updating project '{}' from '{}' in environment '{}'",
                    self.name,
                    self.path.display(),
                    self.env.name()
                );
                (self.sink)(Event::Updating {
                    project: self.name.clone(),
                    env: self.env.name().to_string(),
                });
                self.env.install().await
            }
            InstallAction::Skip => {
                info!(
                    "project '{}' at '{}' already installed in environment '{}'",
                    self.name,
                    self.path.display(),
                    self.env.name()
                );
                (self.sink)(Event::AlreadyInstalled {
                    project: self.name.clone(),
                    env: self.env.name().to_string(),
                });
                Ok(())
            }
        }
    }

    /// Re-sync an installed project's dependencies, the distinct capability
    /// to a forced re-install.
    pub async fn update(&self) -> Result<()> {
        (self.sink)(Event::Updating {
            project: self.name.clone(),
            env: self.env.name().to_string(),
        });
        self.env.update().await
    }

    /// Run a command in the project's environment, installing first if the
    /// environment is missing or does not contain the project. Commands
    /// executed through this path always run against an installed
    /// environment. Returns captured stdout.
    pub async fn run(&self, args: &[String]) -> Result<String> {
        if self.env_state().await? != EnvState::Installed {
            self.install(false).await?;
        }
        self.env.run(args).await
    }

    fn emit_installing(&self) {
        info!(
            "installing project '{}' from '{}' into environment '{}'",
            self.name,
            self.path.display(),
            self.env.name()
        );
        (self.sink)(Event::InstallStarted {
            project: self.name.clone(),
            env: self.env.name().to_string(),
        });
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("env", &self.env)
            .finish()
    }
}
