//! corral - multi-project pipeline runner with isolated environments

pub mod cli;
pub mod core;
pub mod env;

// Re-export commonly used types
pub use core::{plan_install, EnvState, InstallAction};
pub use core::{Descriptor, Error, Event, EventSink, Pipeline, Project, Result, Step};
pub use env::{EnvTool, EnvToolConfig, Environment, SubprocessEnvTool};
