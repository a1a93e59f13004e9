//! Project descriptor loading and scoped table access.
//!
//! Every project root carries a `corral.toml` descriptor: an identity table
//! (`[project]` with `name`), and for pipelines a `[pipeline]` table with a
//! `steps` list plus a `[runcfg]` scripts-configuration table. The loaded
//! mapping is immutable; external reads always get an independent copy so
//! mutations can never leak back into the shared instance.

use crate::core::error::{Error, Result};
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// File name of the per-project descriptor.
pub const DESCRIPTOR_FILE: &str = "corral.toml";

/// A parsed project descriptor.
#[derive(Debug, Clone)]
pub struct Descriptor {
    /// Path to the descriptor file itself.
    path: PathBuf,
    root: Table,
}

impl Descriptor {
    /// Load the descriptor for the project rooted at `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(DESCRIPTOR_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::MissingDescriptor {
                    path: dir.to_path_buf(),
                }
            } else {
                Error::DescriptorParse {
                    path: path.clone(),
                    message: e.to_string(),
                }
            }
        })?;
        Self::from_toml(&path, &content)
    }

    /// Parse a descriptor from TOML text, recording `path` for diagnostics.
    pub fn from_toml(path: &Path, content: &str) -> Result<Self> {
        let root = content
            .parse::<Table>()
            .map_err(|e| Error::DescriptorParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    /// Path to the descriptor file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The full descriptor mapping, as a defensive copy.
    pub fn table(&self) -> Table {
        self.root.clone()
    }

    /// A scoped view of one top-level table, as a defensive copy.
    ///
    /// Fails with [`Error::MissingKey`] naming the table when it is absent
    /// or not a table; callers may catch that to supply defaults.
    pub fn section(&self, name: &str) -> Result<Table> {
        match self.root.get(name) {
            Some(Value::Table(table)) => Ok(table.clone()),
            _ => Err(self.missing(name)),
        }
    }

    /// The project name from the `[project]` identity table.
    pub fn project_name(&self) -> Result<String> {
        let project = self.section("project")?;
        match project.get("name") {
            Some(Value::String(name)) => Ok(name.clone()),
            _ => Err(self.missing("project.name")),
        }
    }

    /// A `MissingKey` error scoped to this descriptor.
    pub fn missing(&self, table: &str) -> Error {
        Error::MissingKey {
            table: table.to_string(),
            path: self.path.clone(),
        }
    }
}
