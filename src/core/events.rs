//! Lifecycle events emitted by projects and pipelines.
//!
//! Components never log through ambient global state; they emit discrete
//! events into an injected sink. The CLI installs a console-printing sink,
//! library callers can install their own or use [`null_sink`].

use std::sync::Arc;

/// Events that can occur during install and pipeline execution.
#[derive(Debug, Clone)]
pub enum Event {
    /// A new environment was provisioned.
    EnvironmentCreated { env: String },
    /// A project is being installed into its environment.
    InstallStarted { project: String, env: String },
    /// A force-install over an already-installed project.
    Updating { project: String, env: String },
    /// The project was already installed; nothing to do.
    AlreadyInstalled { project: String, env: String },
    PipelineStarted { pipeline: String, steps: usize },
    StepStarted { index: usize, component: String, command: String, subcommand: Option<String> },
    StepCompleted { index: usize, component: String, output: String },
    PipelineCompleted { pipeline: String },
}

/// Type for event sinks.
pub type EventSink = Arc<dyn Fn(Event) + Send + Sync>;

/// A sink that drops every event.
pub fn null_sink() -> EventSink {
    Arc::new(|_| {})
}

/// A sink that collects events into a shared vector, for tests.
pub fn collecting_sink() -> (EventSink, Arc<std::sync::Mutex<Vec<Event>>>) {
    let events = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink_events = events.clone();
    let sink: EventSink = Arc::new(move |event| {
        sink_events.lock().unwrap().push(event);
    });
    (sink, events)
}
