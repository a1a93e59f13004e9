//! Pipelines: ordered steps across sibling projects.

use crate::core::descriptor::Descriptor;
use crate::core::error::Result;
use crate::core::events::{Event, EventSink};
use crate::core::project::Project;
use crate::core::step::Step;
use crate::env::EnvTool;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Flag passed to sub-project commands ahead of the override argument.
pub const OVERRIDE_FLAG: &str = "--runcfg";

/// A pipeline: a project-like root declaring an ordered list of steps over
/// sibling sub-projects, plus the scripts registry the downstream
/// configuration resolver uses to scope overrides.
///
/// A pipeline owns no environment of its own; each step borrows a fresh,
/// short-lived [`Project`] with its own environment.
pub struct Pipeline {
    path: PathBuf,
    descriptor: Descriptor,
    steps: Vec<String>,
    scripts: HashSet<String>,
    tool: Arc<dyn EnvTool>,
    sink: EventSink,
}

impl Pipeline {
    /// Open the pipeline rooted at `path`.
    ///
    /// Construction requires a `[pipeline]` table with a `steps` list and a
    /// `[runcfg]` scripts-configuration table; a pipeline missing either
    /// cannot resolve anything, so absence is a fatal
    /// [`Error::MissingKey`].
    pub fn open(path: &Path, tool: Arc<dyn EnvTool>, sink: EventSink) -> Result<Self> {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let descriptor = Descriptor::load(&path)?;

        let pipeline_table = descriptor.section("pipeline")?;
        let steps = match pipeline_table.get("steps") {
            Some(toml::Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    toml::Value::String(s) => Ok(s.clone()),
                    _ => Err(descriptor.missing("pipeline.steps")),
                })
                .collect::<Result<Vec<_>>>()?,
            _ => return Err(descriptor.missing("pipeline.steps")),
        };

        let runcfg = descriptor.section("runcfg")?;
        let scripts = Self::script_names(&runcfg);

        Ok(Self {
            path,
            descriptor,
            steps,
            scripts,
            tool,
            sink,
        })
    }

    /// Registered script names from the scripts-configuration table.
    /// `scripts` may be a list of names or a table keyed by name; when the
    /// key is absent no commands are registered.
    fn script_names(runcfg: &toml::Table) -> HashSet<String> {
        match runcfg.get("scripts") {
            Some(toml::Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(toml::Value::Table(table)) => table.keys().cloned().collect(),
            _ => HashSet::new(),
        }
    }

    /// The pipeline's absolute filesystem root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The pipeline's name, falling back to the directory name when the
    /// descriptor carries no identity table.
    pub fn name(&self) -> String {
        self.descriptor.project_name().unwrap_or_else(|_| {
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string())
        })
    }

    /// The declared steps, in execution order.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Whether `command` is a registered script name.
    pub fn is_script(&self, command: &str) -> bool {
        self.scripts.contains(command)
    }

    /// Construct the sub-project for a step's component, rooted at the
    /// sibling directory `<pipeline_path>/<name>`.
    pub fn create_project(&self, name: &str) -> Result<Project> {
        Project::open(&self.path.join(name), self.tool.clone(), self.sink.clone())
    }

    /// Build the override argument a step's command receives.
    ///
    /// The base is the pipeline's own absolute path. A registered script
    /// command appends `:command` (and `:subcommand` when present); an
    /// unregistered command with a subcommand appends `::subcommand`, the
    /// empty middle segment telling the downstream resolver there is no
    /// command-level override. Exactly one of four shapes results:
    /// `<path>`, `<path>:<cmd>`, `<path>:<cmd>:<sub>`, `<path>::<sub>`.
    pub fn override_argument(&self, command: &str, subcommand: Option<&str>) -> String {
        let mut arg = self.path.display().to_string();
        if self.is_script(command) {
            arg.push(':');
            arg.push_str(command);
            if let Some(sub) = subcommand {
                arg.push(':');
                arg.push_str(sub);
            }
        } else if let Some(sub) = subcommand {
            arg.push_str("::");
            arg.push_str(sub);
        }
        arg
    }

    /// Run one resolved step inside `project`, returning captured stdout.
    pub async fn run_step(
        &self,
        project: &Project,
        command: &str,
        subcommand: Option<&str>,
    ) -> Result<String> {
        let override_arg = self.override_argument(command, subcommand);
        debug!(
            "running '{}' in project '{}' with {} {}",
            command,
            project.name(),
            OVERRIDE_FLAG,
            override_arg
        );
        let args = vec![
            command.to_string(),
            OVERRIDE_FLAG.to_string(),
            override_arg,
        ];
        project.run(&args).await
    }

    /// Run every step in declared order, sequentially.
    ///
    /// Steps run one at a time; a later step may depend on the installed
    /// state an earlier one produced. The first parse or execution failure
    /// aborts the remaining steps. Returns each step's captured stdout.
    pub async fn run(&self) -> Result<Vec<String>> {
        let name = self.name();
        info!("starting pipeline '{}' ({} steps)", name, self.steps.len());
        (self.sink)(Event::PipelineStarted {
            pipeline: name.clone(),
            steps: self.steps.len(),
        });

        let mut outputs = Vec::with_capacity(self.steps.len());
        for (index, raw) in self.steps.iter().enumerate() {
            let step = Step::parse(raw)?;
            (self.sink)(Event::StepStarted {
                index,
                component: step.component.clone(),
                command: step.command.clone(),
                subcommand: step.subcommand.clone(),
            });

            let project = self.create_project(&step.component)?;
            let stdout = self
                .run_step(&project, &step.command, step.subcommand.as_deref())
                .await?;
            info!("step '{}' output:\n{}", step, stdout);
            (self.sink)(Event::StepCompleted {
                index,
                component: step.component.clone(),
                output: stdout.clone(),
            });
            outputs.push(stdout);
        }

        (self.sink)(Event::PipelineCompleted { pipeline: name });
        Ok(outputs)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("path", &self.path)
            .field("steps", &self.steps)
            .field("scripts", &self.scripts)
            .finish()
    }
}
