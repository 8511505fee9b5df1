use indexmap::{IndexMap, IndexSet};

use super::attribute::{attributes_of, Attribute};
use super::{Content, ElementKey};
use crate::xsd::{ContentType, ValueKind, XsdType, ANY_TYPE};

/// A simple or complex type, with its attributes and composition
#[derive(Debug, Clone)]
pub struct NamedType {
    raw: XsdType,
    attributes: IndexMap<String, Attribute>,
    pub(crate) content: Content,
}

impl NamedType {
    /// Wrap a type; the composition is filled in by the cache
    pub(crate) fn new(raw: XsdType) -> Self {
        let attributes = match &raw {
            XsdType::Complex(complex_type) => attributes_of(complex_type),
            XsdType::Simple(_) => IndexMap::new(),
        };
        Self {
            raw,
            attributes,
            content: Content::default(),
        }
    }

    /// The wrapped schema component
    pub fn xsd(&self) -> &XsdType {
        &self.raw
    }

    /// Local name (None for anonymous types)
    pub fn local_name(&self) -> Option<&str> {
        self.raw.local_name()
    }

    /// Definition as written in the schema
    pub fn definition(&self) -> &str {
        self.raw.definition()
    }

    pub fn is_simple(&self) -> bool {
        self.raw.is_simple()
    }

    pub fn is_complex(&self) -> bool {
        self.raw.is_complex()
    }

    pub fn is_any_type(&self) -> bool {
        self.local_name() == Some(ANY_TYPE)
    }

    /// Content classification; simple types count as simple content
    pub fn content_type(&self) -> ContentType {
        match &self.raw {
            XsdType::Simple(_) => ContentType::Simple,
            XsdType::Complex(complex_type) => complex_type.content_type(),
        }
    }

    /// Whether text or elements may appear
    pub fn has_content(&self) -> bool {
        self.content_type() != ContentType::Empty
    }

    pub fn is_element_only(&self) -> bool {
        self.content_type() == ContentType::ElementOnly
    }

    pub fn is_mixed(&self) -> bool {
        self.content_type() == ContentType::Mixed
    }

    /// Text content without child elements
    pub fn is_text_only(&self) -> bool {
        self.content_type() == ContentType::Simple
    }

    /// A complex type with no attributes and no content, e.g. `<hr/>`
    pub fn is_placeholder(&self) -> bool {
        self.is_complex() && !self.has_content() && !self.has_attributes()
    }

    /// Value family of a simple type or of simple content
    pub fn value_kind(&self) -> Option<ValueKind> {
        match &self.raw {
            XsdType::Simple(simple_type) => Some(simple_type.root_kind()),
            XsdType::Complex(complex_type) => match &complex_type.content {
                crate::xsd::ComplexContent::Simple(simple_type) => Some(simple_type.root_kind()),
                _ => None,
            },
        }
    }

    /// Declared attributes, counting an attribute wildcard
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
            || matches!(&self.raw, XsdType::Complex(complex_type) if complex_type.any_attribute)
    }

    /// Attributes in declaration order, inherited ones first
    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn required_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values().filter(|a| a.is_required())
    }

    pub fn optional_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values().filter(|a| a.is_optional())
    }

    /// Whether any attribute is an enumeration
    pub fn has_enum_attributes(&self) -> bool {
        self.attributes.values().any(Attribute::is_enum)
    }

    /// Child elements by name
    pub fn elements(&self) -> &IndexMap<String, ElementKey> {
        &self.content.elements
    }

    /// Referenced group names
    pub fn groups(&self) -> &IndexSet<String> {
        &self.content.groups
    }

    pub fn content(&self) -> &Content {
        &self.content
    }
}
