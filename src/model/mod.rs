//! Type model
//!
//! Read-only views over schema components, as held by the
//! [`ResolutionCache`](crate::cache::ResolutionCache). Cross-references
//! between entities are stored as names and resolved through the cache,
//! so self-referential grammars never form ownership cycles.

mod attribute;
mod element;
mod group;
mod named_type;

pub use attribute::Attribute;
pub use element::{Element, ElementKey, TypeBinding};
pub use group::Group;
pub use named_type::NamedType;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three namespaces of the resolution cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Named model group
    Group,
    /// Named type
    Type,
    /// Element declaration
    Element,
}

impl ComponentKind {
    /// Lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Type => "type",
            Self::Element => "element",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element and group composition of a named type or group.
///
/// Nested compositors are flattened. Group references are recorded by
/// name and never expanded here.
#[derive(Debug, Clone, Default)]
pub struct Content {
    /// Child elements by name, in declaration order
    pub elements: IndexMap<String, ElementKey>,
    /// Referenced groups, in declaration order
    pub groups: IndexSet<String>,
    /// Particles with no model counterpart (element wildcards)
    pub unhandled: Vec<String>,
}

impl Content {
    /// Whether there are no elements and no group references
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.groups.is_empty() && self.unhandled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_kind_display() {
        assert_eq!(ComponentKind::Group.to_string(), "group");
        assert_eq!(ComponentKind::Type.to_string(), "type");
        assert_eq!(ComponentKind::Element.to_string(), "element");
    }

    #[test]
    fn test_component_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ComponentKind::Element).unwrap();
        assert_eq!(json, "\"element\"");
    }

    #[test]
    fn test_empty_content() {
        let mut content = Content::default();
        assert!(content.is_empty());
        content.groups.insert("docTitleCmdGroup".to_string());
        assert!(!content.is_empty());
    }
}
