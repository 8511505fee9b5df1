//! Class specifications produced by the builder

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::ComponentKind;

/// Everything needed to emit one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSpec {
    /// Entity name as declared in the schema
    pub name: String,
    /// Namespace the entity came from
    pub category: ComponentKind,
    /// Supertypes, in declaration order
    pub extends: Vec<String>,
    /// Attribute categorization
    #[serde(default)]
    pub attributes: AttributeSpecs,
    /// Element categorization
    #[serde(default)]
    pub elements: ElementSpecs,
}

/// Category of an attribute accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeCategory {
    Simple,
    Enum,
    Bool,
}

impl AttributeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Enum => "enum",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for AttributeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a child element accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    Any,
    Complex,
    Placeholder,
    Simple,
}

impl ElementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Complex => "complex",
            Self::Placeholder => "placeholder",
            Self::Simple => "simple",
        }
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes grouped by category.
///
/// Iteration order is fixed: simple, enum, bool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpecs {
    /// Name to value kind
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub simple: IndexMap<String, String>,
    /// Name to legal values
    #[serde(rename = "enum", default, skip_serializing_if = "IndexMap::is_empty")]
    pub enums: IndexMap<String, Vec<String>>,
    /// Boolean attribute names
    #[serde(rename = "bool", default, skip_serializing_if = "Vec::is_empty")]
    pub bools: Vec<String>,
}

impl AttributeSpecs {
    pub fn is_empty(&self) -> bool {
        self.simple.is_empty() && self.enums.is_empty() && self.bools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.simple.len() + self.enums.len() + self.bools.len()
    }

    /// Attribute names with their category, in emission order
    pub fn iter(&self) -> impl Iterator<Item = (&str, AttributeCategory)> {
        self.simple
            .keys()
            .map(|name| (name.as_str(), AttributeCategory::Simple))
            .chain(
                self.enums
                    .keys()
                    .map(|name| (name.as_str(), AttributeCategory::Enum)),
            )
            .chain(
                self.bools
                    .iter()
                    .map(|name| (name.as_str(), AttributeCategory::Bool)),
            )
    }

    pub fn category_of(&self, name: &str) -> Option<AttributeCategory> {
        self.iter()
            .find(|(attribute, _)| *attribute == name)
            .map(|(_, category)| category)
    }
}

/// Child elements grouped by category, categories in lexicographic order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpecs {
    /// Elements of `xs:anyType`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any: Vec<String>,
    /// Name to type name
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub complex: IndexMap<String, String>,
    /// Marker elements with no attributes and no content
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub placeholder: Vec<String>,
    /// Name to value kind
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub simple: IndexMap<String, String>,
    /// Filtered accessors for enum-discriminated complex elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<CollectionSpec>,
}

impl ElementSpecs {
    pub fn is_empty(&self) -> bool {
        self.any.is_empty()
            && self.complex.is_empty()
            && self.placeholder.is_empty()
            && self.simple.is_empty()
    }

    /// Element names with their category, categories in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ElementCategory)> {
        let any = self.any.iter().map(|n| (n.as_str(), ElementCategory::Any));
        let complex = self
            .complex
            .keys()
            .map(|n| (n.as_str(), ElementCategory::Complex));
        let placeholder = self
            .placeholder
            .iter()
            .map(|n| (n.as_str(), ElementCategory::Placeholder));
        let simple = self
            .simple
            .keys()
            .map(|n| (n.as_str(), ElementCategory::Simple));
        any.chain(complex).chain(placeholder).chain(simple)
    }

    pub fn category_of(&self, name: &str) -> Option<ElementCategory> {
        self.iter()
            .find(|(element, _)| *element == name)
            .map(|(_, category)| category)
    }

    /// Collection for a child element tag
    pub fn collection(&self, tag: &str) -> Option<&CollectionSpec> {
        self.collections.iter().find(|c| c.tag == tag)
    }
}

/// Filtered accessors for a complex child element whose type carries
/// enumerated attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSpec {
    /// Child element tag
    pub tag: String,
    /// Local name of the child element's type
    pub type_name: String,
    /// One filter group per enumerated attribute
    pub filters: Vec<FilterGroup>,
}

/// Filters on one discriminator attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Discriminator attribute
    pub attribute: String,
    /// Equality predicate with a `{}` slot for the literal
    pub predicate: String,
    /// Pluralized literal to literal
    pub values: IndexMap<String, String>,
}

impl FilterGroup {
    /// Empty filter group for an attribute
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        let predicate = format!("[@{}=\"{{}}\"]", attribute);
        Self {
            attribute,
            predicate,
            values: IndexMap::new(),
        }
    }

    /// Predicate with the literal filled in
    pub fn predicate_for(&self, literal: &str) -> String {
        self.predicate.replacen("{}", literal, 1)
    }
}
