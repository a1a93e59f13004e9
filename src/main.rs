mod cli;
mod core;
mod env;

use anyhow::{Context, Result};
use cli::commands::{BuildCommand, RunCommand, ValidateCommand};
use cli::output::*;
use cli::{Cli, Command};
use core::descriptor::Descriptor;
use core::events::EventSink;
use core::{Pipeline, Project};
use env::{EnvTool, EnvToolConfig, SubprocessEnvTool};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    match &cli.log_file {
        Some(log_file) => {
            let file = std::fs::File::create(log_file)
                .with_context(|| format!("Failed to open log file '{}'", log_file))?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(log_level)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set logging subscriber")?;
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(log_level)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .context("Failed to set logging subscriber")?;
        }
    }

    let tool = env_tool(&cli);

    // Execute command
    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd, tool).await?,
        Command::Build(cmd) => build_project(cmd, tool).await?,
        Command::Validate(cmd) => validate_descriptor(cmd)?,
    }

    Ok(())
}

fn env_tool(cli: &Cli) -> Arc<dyn EnvTool> {
    let mut config = EnvToolConfig::new();
    if let Some(program) = &cli.env_tool {
        config = config.with_program(program.clone());
    }
    Arc::new(SubprocessEnvTool::new(config))
}

/// Event sink that renders lifecycle events on the console.
fn console_sink() -> EventSink {
    Arc::new(|event| println!("{}", format_event(&event)))
}

async fn run_pipeline(cmd: &RunCommand, tool: Arc<dyn EnvTool>) -> Result<()> {
    let pipeline = Pipeline::open(Path::new(&cmd.pipeline), tool, console_sink())
        .context("Failed to load pipeline")?;

    println!(
        "{} Loaded pipeline: {}",
        INFO,
        style(pipeline.name()).bold()
    );

    match pipeline.run().await {
        Ok(outputs) => {
            if cmd.show_output {
                for output in &outputs {
                    print!("{}", format_output(output));
                }
            }
            Ok(())
        }
        Err(e) => {
            println!("{} {}", CROSS, style(&e).red());
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

async fn build_project(cmd: &BuildCommand, tool: Arc<dyn EnvTool>) -> Result<()> {
    let project = Project::open(Path::new(&cmd.project), tool, console_sink())
        .context("Failed to load project")?;

    match project.install(cmd.force).await {
        Ok(()) => {
            println!(
                "{} {} ready in environment {}",
                CHECK,
                style(project.name()).bold(),
                style(project.env().name()).cyan()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", CROSS, style(&e).red());
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn validate_descriptor(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating descriptor...", INFO);

    match Descriptor::load(Path::new(&cmd.path)) {
        Ok(descriptor) => {
            let summary = DescriptorSummary::of(&descriptor);

            println!("{} Descriptor is valid!", CHECK);
            if let Some(name) = &summary.name {
                println!("  Name: {}", style(name).bold());
            }
            if let Some(steps) = summary.steps {
                println!("  Steps: {}", style(steps).cyan());
            }

            if cmd.json {
                println!("\n{}", serde_json::to_string_pretty(&summary)?);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
