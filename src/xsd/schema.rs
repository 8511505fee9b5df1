//! Loaded XSD schema
//!
//! [`XsdSchema`] holds the global components of one schema (the root
//! document plus everything it includes or imports) and answers lookups
//! by name through the [`ComponentSource`] trait.

use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::builtins::ANY_TYPE;
use super::components::{XsdComplexType, XsdElement, XsdGroup, XsdSimpleType, XsdType};
use crate::namespaces::QName;

/// Source of raw schema constructs, looked up by name.
///
/// The resolution cache only ever talks to a schema through this trait.
pub trait ComponentSource {
    /// Find a named model group
    fn find_group(&self, name: &QName) -> Option<Arc<XsdGroup>>;

    /// Find a type: XSD built-ins, named complex types or named simple types
    fn find_type(&self, name: &QName) -> Option<XsdType>;

    /// Find a global element declaration
    fn find_element(&self, name: &QName) -> Option<Arc<XsdElement>>;
}

/// A parsed and linked XSD schema
#[derive(Debug, Default)]
pub struct XsdSchema {
    /// Target namespace of the root document
    pub target_namespace: Option<String>,
    /// Location of the root document, when loaded from a file
    pub location: Option<PathBuf>,
    pub(crate) groups: IndexMap<String, Arc<XsdGroup>>,
    pub(crate) complex_types: IndexMap<String, Arc<XsdComplexType>>,
    pub(crate) simple_types: IndexMap<String, Arc<XsdSimpleType>>,
    pub(crate) elements: IndexMap<QName, Arc<XsdElement>>,
}

impl XsdSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Named model groups in document order
    pub fn groups(&self) -> impl Iterator<Item = &Arc<XsdGroup>> {
        self.groups.values()
    }

    /// Named complex types in document order
    pub fn complex_types(&self) -> impl Iterator<Item = &Arc<XsdComplexType>> {
        self.complex_types.values()
    }

    /// Named simple types in document order
    pub fn simple_types(&self) -> impl Iterator<Item = &Arc<XsdSimpleType>> {
        self.simple_types.values()
    }

    /// Global element declarations in document order
    pub fn elements(&self) -> impl Iterator<Item = &Arc<XsdElement>> {
        self.elements.values()
    }

    /// Named model group by local name
    pub fn group(&self, name: &str) -> Option<&Arc<XsdGroup>> {
        self.groups.get(name)
    }

    /// Named complex type by local name
    pub fn complex_type(&self, name: &str) -> Option<&Arc<XsdComplexType>> {
        self.complex_types.get(name)
    }

    /// Named simple type by local name
    pub fn simple_type(&self, name: &str) -> Option<&Arc<XsdSimpleType>> {
        self.simple_types.get(name)
    }

    /// First global element with the given local name
    pub fn element(&self, name: &str) -> Option<&Arc<XsdElement>> {
        self.elements
            .iter()
            .find(|(qname, _)| qname.local_name == name)
            .map(|(_, element)| element)
    }

    /// Named type (complex first, then simple) by local name
    pub fn named_type(&self, name: &str) -> Option<XsdType> {
        self.complex_types
            .get(name)
            .map(|ct| XsdType::Complex(Arc::clone(ct)))
            .or_else(|| {
                self.simple_types
                    .get(name)
                    .map(|st| XsdType::Simple(Arc::clone(st)))
            })
    }
}

impl ComponentSource for XsdSchema {
    fn find_group(&self, name: &QName) -> Option<Arc<XsdGroup>> {
        self.groups.get(&name.local_name).cloned()
    }

    fn find_type(&self, name: &QName) -> Option<XsdType> {
        if name.is_xsd() {
            if name.local_name == ANY_TYPE {
                return Some(XsdType::Complex(Arc::new(XsdComplexType::any_type())));
            }
            return XsdSimpleType::builtin(&name.local_name).map(|st| XsdType::Simple(Arc::new(st)));
        }
        self.named_type(&name.local_name)
    }

    fn find_element(&self, name: &QName) -> Option<Arc<XsdElement>> {
        self.elements
            .get(name)
            .or_else(|| self.element(&name.local_name))
            .cloned()
    }
}
