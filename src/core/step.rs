//! Pipeline step parsing.

use crate::core::error::{Error, Result};

/// One pipeline instruction: a target component, a command to run in it and
/// an optional subcommand. Parsed from a `component:command[:subcommand]`
/// string; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub component: String,
    pub command: String,
    pub subcommand: Option<String>,
}

impl Step {
    /// Parse a colon-delimited step string.
    ///
    /// Exactly two or three fields are accepted, and every field must be
    /// non-empty; anything else fails with [`Error::StepParse`] carrying the
    /// raw string.
    pub fn parse(raw: &str) -> Result<Self> {
        let fields: Vec<&str> = raw.split(':').collect();
        if !(fields.len() == 2 || fields.len() == 3) || fields.iter().any(|f| f.is_empty()) {
            return Err(Error::StepParse {
                step: raw.to_string(),
            });
        }
        Ok(Self {
            component: fields[0].to_string(),
            command: fields[1].to_string(),
            subcommand: fields.get(2).map(|s| s.to_string()),
        })
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.subcommand {
            Some(sub) => write!(f, "{}:{}:{}", self.component, self.command, sub),
            None => write!(f, "{}:{}", self.component, self.command),
        }
    }
}
