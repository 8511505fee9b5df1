use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

use super::{Content, ElementKey};
use crate::xsd::XsdGroup;

/// A named model group.
///
/// Holds the same composition as a [`NamedType`](super::NamedType) but
/// never attributes.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    raw: Arc<XsdGroup>,
    pub(crate) content: Content,
}

impl Group {
    pub(crate) fn new(name: impl Into<String>, raw: Arc<XsdGroup>) -> Self {
        Self {
            name: name.into(),
            raw,
            content: Content::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped schema component
    pub fn xsd(&self) -> &XsdGroup {
        &self.raw
    }

    /// Definition as written in the schema
    pub fn definition(&self) -> &str {
        &self.raw.definition
    }

    pub fn elements(&self) -> &IndexMap<String, ElementKey> {
        &self.content.elements
    }

    pub fn groups(&self) -> &IndexSet<String> {
        &self.content.groups
    }

    pub fn content(&self) -> &Content {
        &self.content
    }
}
