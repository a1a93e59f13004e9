//! CLI output formatting

use crate::core::{Descriptor, Event};
use console::Emoji;
use serde::Serialize;
use std::path::PathBuf;

// Re-export style
pub use console::style;

/// What `validate` reports about a descriptor.
#[derive(Debug, Serialize)]
pub struct DescriptorSummary {
    pub path: PathBuf,
    pub name: Option<String>,
    pub steps: Option<usize>,
}

impl DescriptorSummary {
    pub fn of(descriptor: &Descriptor) -> Self {
        let steps = descriptor
            .section("pipeline")
            .ok()
            .and_then(|t| t.get("steps").and_then(|v| v.as_array().map(|a| a.len())));
        Self {
            path: descriptor.path().to_path_buf(),
            name: descriptor.project_name().ok(),
            steps,
        }
    }
}

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "+ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a lifecycle event for display
pub fn format_event(event: &Event) -> String {
    match event {
        Event::EnvironmentCreated { env } => {
            format!("{} Created environment {}", PACKAGE, style(env).cyan())
        }
        Event::InstallStarted { project, env } => format!(
            "{} Installing {} into {}",
            PACKAGE,
            style(project).bold(),
            style(env).cyan()
        ),
        Event::Updating { project, env } => format!(
            "{} Updating {} in {}",
            PACKAGE,
            style(project).bold(),
            style(env).cyan()
        ),
        Event::AlreadyInstalled { project, env } => format!(
            "{} {} already installed in {}",
            INFO,
            style(project).bold(),
            style(env).cyan()
        ),
        Event::PipelineStarted { pipeline, steps } => format!(
            "{} Starting pipeline {} ({} steps)",
            ROCKET,
            style(pipeline).bold(),
            style(steps).cyan()
        ),
        Event::StepStarted {
            index,
            component,
            command,
            subcommand,
        } => {
            let target = match subcommand {
                Some(sub) => format!("{}:{}", command, sub),
                None => command.clone(),
            };
            format!(
                "{} Step {}: {} in {}",
                INFO,
                index + 1,
                style(target).cyan(),
                style(component).bold()
            )
        }
        Event::StepCompleted {
            index, component, ..
        } => format!(
            "{} Step {} ({}) completed",
            CHECK,
            index + 1,
            style(component).bold()
        ),
        Event::PipelineCompleted { pipeline } => {
            format!(
                "{} {} completed {}",
                CHECK,
                style(pipeline).bold(),
                style("successfully").green()
            )
        }
    }
}

/// Format captured step output, indented under a dim header
pub fn format_output(output: &str) -> String {
    let mut rendered = String::new();
    for line in output.lines() {
        rendered.push_str(&format!("    {}\n", style(line).dim()));
    }
    rendered
}
