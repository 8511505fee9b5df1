//! Derived specification document
//!
//! The hand-off to the code emitter: one section per schema, each holding
//! the class specifications of its groups, complex types and global
//! elements. Stored as pretty-printed JSON.

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::builder::ClassSpec;
use crate::error::Result;

/// Specifications of one schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSpec {
    #[serde(default)]
    pub groups: Vec<ClassSpec>,
    #[serde(default)]
    pub types: Vec<ClassSpec>,
    #[serde(default)]
    pub elements: Vec<ClassSpec>,
}

impl SchemaSpec {
    /// Total number of class specifications
    pub fn len(&self) -> usize {
        self.groups.len() + self.types.len() + self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn group(&self, name: &str) -> Option<&ClassSpec> {
        self.groups.iter().find(|spec| spec.name == name)
    }

    pub fn named_type(&self, name: &str) -> Option<&ClassSpec> {
        self.types.iter().find(|spec| spec.name == name)
    }

    /// First element specification with the given name
    pub fn element(&self, name: &str) -> Option<&ClassSpec> {
        self.elements.iter().find(|spec| spec.name == name)
    }
}

/// Specifications keyed by schema name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecDocument {
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaSpec>,
}

impl SpecDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a document; a missing file yields an empty document
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No document at {}, starting empty", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the document, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!(schemas = self.schemas.len(); "Wrote specification document to {}", path.display());
        Ok(())
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaSpec> {
        self.schemas.get(name)
    }

    /// Replace a schema's section, discarding whatever it held before
    pub fn replace_schema(&mut self, name: impl Into<String>, spec: SchemaSpec) {
        self.schemas.insert(name.into(), spec);
    }
}
