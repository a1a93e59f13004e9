//! Core domain: descriptors, projects, pipelines and step resolution.

pub mod descriptor;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod project;
pub mod step;

pub use descriptor::Descriptor;
pub use error::{Error, Result};
pub use events::{Event, EventSink};
pub use pipeline::Pipeline;
pub use project::{plan_install, EnvState, InstallAction, Project};
pub use step::Step;
