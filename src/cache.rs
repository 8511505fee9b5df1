//! Resolution cache
//!
//! Deduplicating registry of groups, named types and elements. An entity
//! is registered before its composition is expanded, and group
//! references are recorded by name without expansion, so recursive and
//! mutually recursive grammars resolve in finite time.
//!
//! The cache is owned by whoever starts a schema's compilation and must be
//! cleared before an unrelated schema is processed.

use indexmap::IndexMap;
use log::debug;
use std::sync::Arc;

use crate::model::{Content, Element, ElementKey, Group, NamedType, TypeBinding};
use crate::xsd::{ComponentSource, ElementTypeRef, ModelGroup, Particle, XsdElement, XsdGroup, XsdType};

/// Registry of resolved model entities
#[derive(Debug, Default)]
pub struct ResolutionCache {
    groups: IndexMap<String, Group>,
    types: IndexMap<String, NamedType>,
    elements: IndexMap<ElementKey, Element>,
}

impl ResolutionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached group by name
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Cached named type by local name
    pub fn named_type(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    /// Cached element by key
    pub fn element(&self, key: &ElementKey) -> Option<&Element> {
        self.elements.get(key)
    }

    pub fn contains_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn contains_element(&self, key: &ElementKey) -> bool {
        self.elements.contains_key(key)
    }

    /// Groups in definition order
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Named types in definition order
    pub fn types(&self) -> impl Iterator<Item = &NamedType> {
        self.types.values()
    }

    /// Elements (global and local) in definition order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Total number of cached entities
    pub fn len(&self) -> usize {
        self.groups.len() + self.types.len() + self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached entity
    pub fn clear(&mut self) {
        self.groups.clear();
        self.types.clear();
        self.elements.clear();
    }

    /// Cached group, defining it from `raw` on a miss
    pub fn get_or_define_group(
        &mut self,
        source: &dyn ComponentSource,
        name: &str,
        raw: &Arc<XsdGroup>,
    ) -> &Group {
        if !self.groups.contains_key(name) {
            debug!(name = name; "Defining group");
            self.groups
                .insert(name.to_string(), Group::new(name, Arc::clone(raw)));

            let mut content = Content::default();
            self.expand_model(source, &raw.model, &mut content);
            if let Some(group) = self.groups.get_mut(name) {
                group.content = content;
            }
        }
        &self.groups[name]
    }

    /// Cached named type, defining it from `raw` on a miss
    pub fn get_or_define_type(
        &mut self,
        source: &dyn ComponentSource,
        name: &str,
        raw: &XsdType,
    ) -> &NamedType {
        if !self.types.contains_key(name) {
            debug!(name = name; "Defining type");
            self.types
                .insert(name.to_string(), NamedType::new(raw.clone()));

            let content = self.expand_type(source, raw);
            if let Some(named_type) = self.types.get_mut(name) {
                named_type.content = content;
            }
        }
        &self.types[name]
    }

    /// Cached element, defining it (and its type) on a miss
    pub fn get_or_define_element(
        &mut self,
        source: &dyn ComponentSource,
        declaration: &Arc<XsdElement>,
    ) -> &Element {
        let key = ElementKey::of(declaration);
        if !self.elements.contains_key(&key) {
            self.define_element(source, key.clone(), declaration);
        }
        &self.elements[&key]
    }

    fn define_element(
        &mut self,
        source: &dyn ComponentSource,
        key: ElementKey,
        declaration: &Arc<XsdElement>,
    ) {
        debug!(element:% = key; "Defining element");

        let (raw, owned) = match &declaration.type_ref {
            ElementTypeRef::Named(qname) => (source.find_type(qname), qname.is_xsd()),
            ElementTypeRef::Inline(raw) => (Some(raw.clone()), true),
        };
        let binding = match &raw {
            Some(raw) if owned => TypeBinding::Owned(Box::new(NamedType::new(raw.clone()))),
            _ => TypeBinding::Named(key.type_name.clone().unwrap_or_default()),
        };

        self.elements.insert(
            key.clone(),
            Element::new(key.clone(), Arc::clone(declaration), raw.clone(), binding),
        );

        match raw {
            Some(raw) if owned => {
                let content = self.expand_type(source, &raw);
                if let Some(TypeBinding::Owned(named_type)) =
                    self.elements.get_mut(&key).map(|element| &mut element.binding)
                {
                    named_type.content = content;
                }
            }
            Some(raw) => {
                let name = key.type_name.clone().unwrap_or_default();
                self.get_or_define_type(source, &name, &raw);
            }
            None => debug!(element:% = key; "Element type not found in schema"),
        }
    }

    fn expand_type(&mut self, source: &dyn ComponentSource, raw: &XsdType) -> Content {
        let mut content = Content::default();
        if let XsdType::Complex(complex_type) = raw {
            if let Some(group) = complex_type.model_group() {
                self.expand_model(source, group, &mut content);
            }
        }
        content
    }

    fn expand_model(&mut self, source: &dyn ComponentSource, group: &ModelGroup, content: &mut Content) {
        for particle in &group.particles {
            match particle {
                Particle::Element(declaration) => {
                    let key = self.get_or_define_element(source, declaration).key().clone();
                    content.elements.insert(declaration.name.clone(), key);
                }
                Particle::ElementRef { name, .. } => match source.find_element(name) {
                    Some(declaration) => {
                        let key = self.get_or_define_element(source, &declaration).key().clone();
                        content.elements.insert(declaration.name.clone(), key);
                    }
                    None => {
                        content.elements.insert(
                            name.local_name.clone(),
                            ElementKey::new(name.local_name.as_str(), None::<String>),
                        );
                    }
                },
                Particle::GroupRef { name, .. } => {
                    if let Some(raw) = source.find_group(name) {
                        self.get_or_define_group(source, &name.local_name, &raw);
                    }
                    content.groups.insert(name.local_name.clone());
                }
                Particle::Model(inner) => self.expand_model(source, inner, content),
                Particle::Any { namespace, .. } => content
                    .unhandled
                    .push(format!("element wildcard (namespace {})", namespace)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::QName;
    use crate::xsd::XsdSchema;

    const SCHEMA: &str = r#"
    <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
      <xs:group name="docCmdGroup">
        <xs:choice>
          <xs:element name="bold" type="docMarkupType"/>
          <xs:element name="linebreak" type="docEmptyType"/>
        </xs:choice>
      </xs:group>
      <xs:complexType name="docMarkupType" mixed="true">
        <xs:group ref="docCmdGroup" minOccurs="0" maxOccurs="unbounded"/>
      </xs:complexType>
      <xs:complexType name="docEmptyType"/>
      <xs:complexType name="nodeType">
        <xs:sequence>
          <xs:element name="child" type="nodeType" minOccurs="0"/>
          <xs:element name="label" type="xs:string"/>
        </xs:sequence>
      </xs:complexType>
    </xs:schema>
    "#;

    fn raw_type(schema: &XsdSchema, name: &str) -> XsdType {
        schema.find_type(&QName::local(name)).unwrap()
    }

    #[test]
    fn test_mutually_recursive_group_terminates() {
        let schema = XsdSchema::from_string(SCHEMA).unwrap();
        let mut cache = ResolutionCache::new();

        let raw = schema.find_group(&QName::local("docCmdGroup")).unwrap();
        let group = cache.get_or_define_group(&schema, "docCmdGroup", &raw);
        assert_eq!(group.elements().len(), 2);

        assert_eq!(cache.groups().count(), 1);
        let markup = cache.named_type("docMarkupType").unwrap();
        let groups: Vec<_> = markup.groups().iter().map(String::as_str).collect();
        assert_eq!(groups, ["docCmdGroup"]);
        assert!(markup.elements().is_empty());
    }

    #[test]
    fn test_self_referencing_type_terminates() {
        let schema = XsdSchema::from_string(SCHEMA).unwrap();
        let mut cache = ResolutionCache::new();

        let raw = raw_type(&schema, "nodeType");
        let node = cache.get_or_define_type(&schema, "nodeType", &raw);
        assert_eq!(node.elements().len(), 2);
        assert_eq!(cache.types().count(), 1);

        let child = cache
            .element(&ElementKey::new("child", Some("nodeType")))
            .unwrap();
        assert_eq!(child.resolve_type(&cache).unwrap().local_name(), Some("nodeType"));

        let label = cache
            .element(&ElementKey::new("label", Some("string")))
            .unwrap();
        assert!(matches!(label.binding(), TypeBinding::Owned(_)));
        assert!(label.resolve_type(&cache).unwrap().is_simple());
    }

    #[test]
    fn test_get_or_define_is_idempotent() {
        let schema = XsdSchema::from_string(SCHEMA).unwrap();
        let mut cache = ResolutionCache::new();

        let raw = raw_type(&schema, "docMarkupType");
        cache.get_or_define_type(&schema, "docMarkupType", &raw);
        let len = cache.len();
        cache.get_or_define_type(&schema, "docMarkupType", &raw);
        assert_eq!(cache.len(), len);
    }

    #[test]
    fn test_clear() {
        let schema = XsdSchema::from_string(SCHEMA).unwrap();
        let mut cache = ResolutionCache::new();

        let raw = raw_type(&schema, "nodeType");
        cache.get_or_define_type(&schema, "nodeType", &raw);
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.named_type("nodeType").is_none());
    }

    #[test]
    fn test_wildcards_are_recorded_as_unhandled() {
        let schema = XsdSchema::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="open"><xs:sequence><xs:any/></xs:sequence></xs:complexType>
               </xs:schema>"#,
        )
        .unwrap();
        let mut cache = ResolutionCache::new();

        let raw = raw_type(&schema, "open");
        let open = cache.get_or_define_type(&schema, "open", &raw);
        assert_eq!(open.content().unhandled.len(), 1);
    }
}
