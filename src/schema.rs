//! Schema facade
//!
//! Compiles a loaded [`XsdSchema`] into a [`ResolutionCache`] and exposes
//! the cached entities by name.

use indexmap::IndexMap;
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::cache::ResolutionCache;
use crate::error::{Error, Result};
use crate::model::{ComponentKind, Content, Element, Group, NamedType};
use crate::namespaces::QName;
use crate::xsd::{ComponentSource, XsdSchema, XsdType};

/// A schema bound to the cache it is compiled into
#[derive(Debug)]
pub struct Schema<'c> {
    xsd: XsdSchema,
    cache: &'c mut ResolutionCache,
    compiled: bool,
}

impl<'c> Schema<'c> {
    /// Bind a loaded schema to a cache
    pub fn new(xsd: XsdSchema, cache: &'c mut ResolutionCache) -> Self {
        Self {
            xsd,
            cache,
            compiled: false,
        }
    }

    /// Load a schema file and bind it to a cache
    pub fn from_file(path: impl AsRef<Path>, cache: &'c mut ResolutionCache) -> Result<Self> {
        Ok(Self::new(XsdSchema::from_file(path)?, cache))
    }

    /// The underlying schema
    pub fn xsd(&self) -> &XsdSchema {
        &self.xsd
    }

    /// The cache this schema compiles into
    pub fn cache(&self) -> &ResolutionCache {
        &*self.cache
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Register every group, complex type and global element, in that
    /// order. Calls after the first do nothing.
    pub fn compile(&mut self) {
        if self.compiled {
            return;
        }

        for group in self.xsd.groups() {
            let name = group.name.local_name.as_str();
            self.cache.get_or_define_group(&self.xsd, name, group);
        }
        info!(count = self.xsd.groups().count(); "Compiled groups");

        for complex_type in self.xsd.complex_types() {
            if let Some(name) = complex_type.local_name() {
                let raw = XsdType::Complex(Arc::clone(complex_type));
                self.cache.get_or_define_type(&self.xsd, name, &raw);
            }
        }
        info!(count = self.xsd.complex_types().count(); "Compiled complex types");

        for element in self.xsd.elements() {
            self.cache.get_or_define_element(&self.xsd, element);
        }
        info!(count = self.xsd.elements().count(); "Compiled global elements");

        self.compiled = true;
    }

    /// Named type by local name
    pub fn get_type(&mut self, name: &str) -> Result<&NamedType> {
        let raw = self
            .xsd
            .find_type(&QName::local(name))
            .ok_or_else(|| Error::lookup(ComponentKind::Type, name))?;
        Ok(self.cache.get_or_define_type(&self.xsd, name, &raw))
    }

    /// Named group by name
    pub fn get_group(&mut self, name: &str) -> Result<&Group> {
        let raw = self
            .xsd
            .find_group(&QName::local(name))
            .ok_or_else(|| Error::lookup(ComponentKind::Group, name))?;
        Ok(self.cache.get_or_define_group(&self.xsd, name, &raw))
    }

    /// Global element by local name
    pub fn get_element(&mut self, name: &str) -> Result<&Element> {
        let raw = self
            .xsd
            .find_element(&QName::local(name))
            .ok_or_else(|| Error::lookup(ComponentKind::Element, name))?;
        Ok(self.cache.get_or_define_element(&self.xsd, &raw))
    }

    /// Definition text of a named type
    pub fn type_definition(&mut self, name: &str) -> Result<String> {
        Ok(self.get_type(name)?.definition().to_string())
    }

    /// Definition text of a group
    pub fn group_definition(&mut self, name: &str) -> Result<String> {
        Ok(self.get_group(name)?.definition().to_string())
    }

    /// Definition text of a global element
    pub fn element_definition(&mut self, name: &str) -> Result<String> {
        Ok(self.get_element(name)?.definition().to_string())
    }

    /// Definition text of each child element of a named type
    pub fn type_element_definitions(&mut self, name: &str) -> Result<IndexMap<String, String>> {
        self.get_type(name)?;
        let cache: &ResolutionCache = &*self.cache;
        match cache.named_type(name) {
            Some(named_type) => Ok(element_definitions(cache, named_type.content())),
            None => Err(Error::lookup(ComponentKind::Type, name)),
        }
    }

    /// Definition text of each child element of a group
    pub fn group_element_definitions(&mut self, name: &str) -> Result<IndexMap<String, String>> {
        self.get_group(name)?;
        let cache: &ResolutionCache = &*self.cache;
        match cache.group(name) {
            Some(group) => Ok(element_definitions(cache, group.content())),
            None => Err(Error::lookup(ComponentKind::Group, name)),
        }
    }
}

fn element_definitions(cache: &ResolutionCache, content: &Content) -> IndexMap<String, String> {
    content
        .elements
        .iter()
        .filter_map(|(name, key)| {
            cache
                .element(key)
                .map(|element| (name.clone(), element.definition().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
    <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
      <xs:group name="titleGroup">
        <xs:sequence>
          <xs:element name="title" type="xs:string"/>
        </xs:sequence>
      </xs:group>
      <xs:complexType name="sectionType">
        <xs:sequence>
          <xs:group ref="titleGroup"/>
          <xs:element name="para" type="xs:string" maxOccurs="unbounded"/>
        </xs:sequence>
      </xs:complexType>
      <xs:element name="section" type="sectionType"/>
    </xs:schema>
    "#;

    #[test]
    fn test_compile_is_idempotent() {
        let mut cache = ResolutionCache::new();
        let mut schema = Schema::new(XsdSchema::from_string(SCHEMA).unwrap(), &mut cache);

        schema.compile();
        let len = schema.cache().len();
        assert!(schema.is_compiled());

        schema.compile();
        assert_eq!(schema.cache().len(), len);
    }

    #[test]
    fn test_lookup_error_leaves_cache_untouched() {
        let mut cache = ResolutionCache::new();
        let mut schema = Schema::new(XsdSchema::from_string(SCHEMA).unwrap(), &mut cache);

        let err = schema.get_type("missingType").unwrap_err();
        assert!(matches!(
            err,
            Error::Lookup { kind: ComponentKind::Type, ref name } if name == "missingType"
        ));
        assert!(schema.cache().is_empty());
    }

    #[test]
    fn test_get_defines_on_first_access() {
        let mut cache = ResolutionCache::new();
        let mut schema = Schema::new(XsdSchema::from_string(SCHEMA).unwrap(), &mut cache);

        let section = schema.get_type("sectionType").unwrap();
        assert_eq!(section.groups().len(), 1);
        assert!(schema.cache().contains_group("titleGroup"));
        assert_eq!(schema.get_element("section").unwrap().type_name(), Some("sectionType"));
        assert!(schema.get_group("nope").is_err());
    }

    #[test]
    fn test_definitions() {
        let mut cache = ResolutionCache::new();
        let mut schema = Schema::new(XsdSchema::from_string(SCHEMA).unwrap(), &mut cache);

        let group = schema.group_definition("titleGroup").unwrap();
        assert!(group.starts_with("<xs:group name=\"titleGroup\">"));

        let element = schema.element_definition("section").unwrap();
        assert_eq!(element, "<xs:element name=\"section\" type=\"sectionType\"/>\n");

        let children = schema.type_element_definitions("sectionType").unwrap();
        let names: Vec<_> = children.keys().map(String::as_str).collect();
        assert_eq!(names, ["para"]);

        let children = schema.group_element_definitions("titleGroup").unwrap();
        assert!(children["title"].contains("name=\"title\""));
    }
}
