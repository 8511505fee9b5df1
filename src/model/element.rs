use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::sync::Arc;

use super::attribute::{attributes_of, Attribute};
use super::NamedType;
use crate::cache::ResolutionCache;
use crate::xsd::{XsdElement, XsdType};

/// Cache key of an element: the same name may be declared with
/// different types, so the type name is part of the identity.
///
/// Elements with an anonymous type have no type name to tell them apart,
/// so their key also carries the identity of the declaration itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey {
    /// Element local name
    pub name: String,
    /// Local name of the element's type (None when anonymous)
    pub type_name: Option<String>,
    declaration: Option<usize>,
}

impl ElementKey {
    pub fn new(name: impl Into<String>, type_name: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.map(Into::into),
            declaration: None,
        }
    }

    /// Key of an element declaration
    pub fn of(declaration: &Arc<XsdElement>) -> Self {
        let mut key = Self::new(declaration.name.as_str(), declaration.type_name());
        if key.is_anonymous() {
            key.declaration = Some(Arc::as_ptr(declaration) as usize);
        }
        key
    }

    /// Whether the key names an element with an anonymous type
    pub fn is_anonymous(&self) -> bool {
        self.type_name.is_none()
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_name {
            Some(type_name) => write!(f, "{} ({})", self.name, type_name),
            None => write!(f, "{} (anonymous type)", self.name),
        }
    }
}

/// How an element reaches its type
#[derive(Debug, Clone)]
pub enum TypeBinding {
    /// A user-named type held by the cache
    Named(String),
    /// A built-in or anonymous type owned by the element
    Owned(Box<NamedType>),
}

/// An element declaration bound to its type
#[derive(Debug)]
pub struct Element {
    key: ElementKey,
    declaration: Arc<XsdElement>,
    raw_type: Option<XsdType>,
    pub(crate) binding: TypeBinding,
    attributes: OnceCell<IndexMap<String, Attribute>>,
}

impl Element {
    pub(crate) fn new(
        key: ElementKey,
        declaration: Arc<XsdElement>,
        raw_type: Option<XsdType>,
        binding: TypeBinding,
    ) -> Self {
        Self {
            key,
            declaration,
            raw_type,
            binding,
            attributes: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn key(&self) -> &ElementKey {
        &self.key
    }

    /// Local name of the declared type (None when anonymous)
    pub fn type_name(&self) -> Option<&str> {
        self.key.type_name.as_deref()
    }

    pub fn binding(&self) -> &TypeBinding {
        &self.binding
    }

    /// The wrapped declaration
    pub fn xsd(&self) -> &XsdElement {
        &self.declaration
    }

    /// Definition as written in the schema
    pub fn definition(&self) -> &str {
        &self.declaration.definition
    }

    /// Resolve the element's type; None when a named type is not cached
    pub fn resolve_type<'a>(&'a self, cache: &'a ResolutionCache) -> Option<&'a NamedType> {
        match &self.binding {
            TypeBinding::Named(name) => cache.named_type(name),
            TypeBinding::Owned(named_type) => Some(named_type),
        }
    }

    /// Attributes of the element's type, built on first access
    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        self.attributes.get_or_init(|| match &self.raw_type {
            Some(XsdType::Complex(complex_type)) => attributes_of(complex_type),
            _ => IndexMap::new(),
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        let key = ElementKey::new("memberdef", Some("memberdefType"));
        assert_eq!(key.to_string(), "memberdef (memberdefType)");

        let anonymous = ElementKey::new("para", None::<String>);
        assert_eq!(anonymous.to_string(), "para (anonymous type)");
    }

    #[test]
    fn test_anonymous_keys_differ_by_declaration() {
        let schema = crate::xsd::XsdSchema::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="A">
                   <xs:sequence>
                     <xs:element name="item"><xs:simpleType><xs:restriction base="xs:integer"/></xs:simpleType></xs:element>
                   </xs:sequence>
                 </xs:complexType>
                 <xs:complexType name="B">
                   <xs:sequence>
                     <xs:element name="item"><xs:complexType/></xs:element>
                   </xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        )
        .unwrap();

        let item = |type_name: &str| match schema.complex_type(type_name).unwrap().model_group() {
            Some(group) => match &group.particles[0] {
                crate::xsd::Particle::Element(declaration) => Arc::clone(declaration),
                other => panic!("unexpected particle {:?}", other),
            },
            None => panic!("{} has no content", type_name),
        };

        let a = ElementKey::of(&item("A"));
        let b = ElementKey::of(&item("B"));
        assert!(a.is_anonymous() && b.is_anonymous());
        assert_ne!(a, b);
        assert_eq!(a, ElementKey::of(&item("A")));
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_keys_differ_by_type() {
        let a = ElementKey::new("title", Some("docTitleType"));
        let b = ElementKey::new("title", Some("xsd:string"));
        assert_ne!(a, b);
    }
}
