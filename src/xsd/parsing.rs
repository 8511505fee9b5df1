//! XSD Document Parsing
//!
//! Schema documents are read in two phases. The first phase walks the root
//! document and every document it includes or imports (iteratively, with a
//! worklist) and registers the top-level nodes by name. The second phase
//! links the registered nodes into components: simple types, attributes and
//! attribute groups are resolved eagerly, with circular definitions
//! reported as parse errors.

use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::builtins::{ValueKind, ANY_SIMPLE_TYPE, ANY_TYPE};
use super::components::{
    AttributeUse, ComplexContent, DerivationMethod, ElementTypeRef, ModelGroup, ModelType,
    Occurs, Particle, SimpleVariety, XsdAttribute, XsdComplexType, XsdElement, XsdGroup,
    XsdSimpleType, XsdType,
};
use super::schema::XsdSchema;
use crate::documents::{Document, Element};
use crate::error::{Error, ParseError, Result};
use crate::namespaces::{QName, XML_NAMESPACE, XSD_NAMESPACE};

/// XSD element local names
mod xsd_elements {
    pub const SCHEMA: &str = "schema";
    pub const ELEMENT: &str = "element";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ATTRIBUTE_GROUP: &str = "attributeGroup";
    pub const GROUP: &str = "group";
    pub const SEQUENCE: &str = "sequence";
    pub const CHOICE: &str = "choice";
    pub const ALL: &str = "all";
    pub const ANNOTATION: &str = "annotation";
    pub const IMPORT: &str = "import";
    pub const INCLUDE: &str = "include";
    pub const REDEFINE: &str = "redefine";
    pub const RESTRICTION: &str = "restriction";
    pub const EXTENSION: &str = "extension";
    pub const LIST: &str = "list";
    pub const UNION: &str = "union";
    pub const COMPLEX_CONTENT: &str = "complexContent";
    pub const SIMPLE_CONTENT: &str = "simpleContent";
    pub const ANY: &str = "any";
    pub const ANY_ATTRIBUTE: &str = "anyAttribute";
    pub const NOTATION: &str = "notation";
    pub const ENUMERATION: &str = "enumeration";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const REF: &str = "ref";
    pub const TARGET_NAMESPACE: &str = "targetNamespace";
    pub const NILLABLE: &str = "nillable";
    pub const DEFAULT: &str = "default";
    pub const FIXED: &str = "fixed";
    pub const BASE: &str = "base";
    pub const VALUE: &str = "value";
    pub const MIXED: &str = "mixed";
    pub const NAMESPACE: &str = "namespace";
    pub const SCHEMA_LOCATION: &str = "schemaLocation";
    pub const ITEM_TYPE: &str = "itemType";
    pub const MEMBER_TYPES: &str = "memberTypes";
    pub const MIN_OCCURS: &str = "minOccurs";
    pub const MAX_OCCURS: &str = "maxOccurs";
    pub const USE: &str = "use";
}

use xsd_attrs as attrs;
use xsd_elements as tags;

/// Pending schema work item for iterative processing
struct PendingSchemaWork {
    /// Path to the schema file
    path: PathBuf,
    /// Namespace of the including document (chameleon includes adopt it)
    parent_namespace: Option<String>,
}

/// A top-level node with the namespace it was declared in
#[derive(Debug, Clone)]
struct GlobalNode {
    node: Element,
    namespace: Option<String>,
}

/// Top-level nodes of all loaded documents, keyed by name
#[derive(Debug, Default)]
struct Registry {
    groups: IndexMap<String, GlobalNode>,
    complex_types: IndexMap<String, GlobalNode>,
    simple_types: IndexMap<String, GlobalNode>,
    attributes: IndexMap<String, GlobalNode>,
    attribute_groups: IndexMap<String, GlobalNode>,
    elements: IndexMap<QName, GlobalNode>,
}

impl Registry {
    /// Register the children of an `xs:schema` element.
    ///
    /// Returns the schema locations of includes, imports and redefines.
    fn register(&mut self, root: &Element, namespace: Option<&str>) -> Result<Vec<String>> {
        let mut locations = Vec::new();

        for child in &root.children {
            let local = child.local_name();
            match local {
                tags::INCLUDE | tags::IMPORT | tags::REDEFINE => {
                    if let Some(location) = child.get_attribute(attrs::SCHEMA_LOCATION) {
                        locations.push(location.to_string());
                    }
                    continue;
                }
                tags::ANNOTATION | tags::NOTATION => continue,
                _ => {}
            }

            let name = child.get_attribute(attrs::NAME).ok_or_else(|| {
                ParseError::new(format!("Global {} missing 'name' attribute", local))
                    .with_source(child.to_xml())
            })?;
            let global = GlobalNode {
                node: child.clone(),
                namespace: namespace.map(str::to_string),
            };

            let inserted = match local {
                tags::ELEMENT => insert_new(&mut self.elements, QName::new(namespace, name), global),
                tags::COMPLEX_TYPE => insert_new(&mut self.complex_types, name.to_string(), global),
                tags::SIMPLE_TYPE => insert_new(&mut self.simple_types, name.to_string(), global),
                tags::GROUP => insert_new(&mut self.groups, name.to_string(), global),
                tags::ATTRIBUTE => insert_new(&mut self.attributes, name.to_string(), global),
                tags::ATTRIBUTE_GROUP => {
                    insert_new(&mut self.attribute_groups, name.to_string(), global)
                }
                other => {
                    warn!("Skipping unknown schema child element: {}", other);
                    continue;
                }
            };

            if !inserted {
                warn!(name = name; "Duplicate global {} ignored", local);
            }
        }

        Ok(locations)
    }
}

fn insert_new<K: Hash + Eq>(map: &mut IndexMap<K, GlobalNode>, key: K, value: GlobalNode) -> bool {
    if map.contains_key(&key) {
        return false;
    }
    map.insert(key, value);
    true
}

impl XsdSchema {
    /// Parse an XSD schema from a string.
    ///
    /// Relative schema locations of includes and imports are resolved
    /// against the current directory.
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::load(xml, None)
    }

    /// Parse an XSD schema from UTF-8 bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes)
            .map_err(|e| Error::Xml(format!("Schema is not valid UTF-8: {}", e)))?;
        Self::load(xml, None)
    }

    /// Parse an XSD schema from a file path, following includes and imports
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Resource(format!("Failed to read schema '{}': {}", path.display(), e))
        })?;

        let mut schema = Self::load(&content, Some(path))?;
        schema.location = Some(path.to_path_buf());
        Ok(schema)
    }

    fn load(xml: &str, origin: Option<&Path>) -> Result<Self> {
        let root = parse_schema_root(xml)?;
        let target_namespace = root
            .get_attribute(attrs::TARGET_NAMESPACE)
            .map(str::to_string);

        let mut registry = Registry::default();
        let mut loaded: HashSet<PathBuf> = HashSet::new();
        if let Some(canonical) = origin.and_then(|p| p.canonicalize().ok()) {
            loaded.insert(canonical);
        }

        let mut pending: VecDeque<PendingSchemaWork> = VecDeque::new();
        let locations = registry.register(&root, target_namespace.as_deref())?;
        queue_locations(
            &mut pending,
            &locations,
            origin.and_then(Path::parent),
            target_namespace.as_deref(),
        );

        while let Some(work) = pending.pop_front() {
            if let Ok(canonical) = work.path.canonicalize() {
                if !loaded.insert(canonical) {
                    continue;
                }
            }

            let parsed = std::fs::read_to_string(&work.path)
                .map_err(Error::from)
                .and_then(|content| parse_schema_root(&content));
            let doc_root = match parsed {
                Ok(root) => root,
                Err(e) => {
                    warn!(
                        "Skipping schema document '{}': {}",
                        work.path.display(),
                        e
                    );
                    continue;
                }
            };

            let namespace = doc_root
                .get_attribute(attrs::TARGET_NAMESPACE)
                .map(str::to_string)
                .or(work.parent_namespace);
            let locations = registry.register(&doc_root, namespace.as_deref())?;
            queue_locations(
                &mut pending,
                &locations,
                work.path.parent(),
                namespace.as_deref(),
            );
        }

        SchemaBuilder::new(&registry).build(target_namespace)
    }
}

fn queue_locations(
    pending: &mut VecDeque<PendingSchemaWork>,
    locations: &[String],
    base: Option<&Path>,
    namespace: Option<&str>,
) {
    for location in locations {
        if location.contains("://") {
            warn!(location = location.as_str(); "Remote schema locations are not loaded");
            continue;
        }
        let path = match base {
            Some(base) => base.join(location),
            None => PathBuf::from(location),
        };
        pending.push_back(PendingSchemaWork {
            path,
            parent_namespace: namespace.map(str::to_string),
        });
    }
}

/// Parse a document and check that its root is `xs:schema`
fn parse_schema_root(xml: &str) -> Result<Element> {
    let doc = Document::from_string(xml)?;
    let root = doc
        .root
        .ok_or_else(|| Error::Parse(ParseError::new("Empty document")))?;

    if root.local_name() != tags::SCHEMA || root.namespace() != Some(XSD_NAMESPACE) {
        return Err(Error::Parse(ParseError::new(format!(
            "Expected xs:schema root element, got {}",
            root.prefixed_name()
        ))));
    }

    Ok(root)
}

fn parse_occurs(node: &Element) -> Result<Occurs> {
    Occurs::parse(
        node.get_attribute(attrs::MIN_OCCURS),
        node.get_attribute(attrs::MAX_OCCURS),
    )
}

fn enumeration_facets(node: &Element) -> Vec<String> {
    node.find_children(tags::ENUMERATION)
        .iter()
        .filter_map(|facet| facet.get_attribute(attrs::VALUE))
        .map(str::to_string)
        .collect()
}

fn builtin_simple_type(kind: ValueKind, local_name: &str) -> Arc<XsdSimpleType> {
    Arc::new(XsdSimpleType {
        name: Some(QName::namespaced(XSD_NAMESPACE, local_name)),
        variety: SimpleVariety::Builtin(kind),
        definition: String::new(),
    })
}

fn any_simple_type() -> Arc<XsdSimpleType> {
    builtin_simple_type(ValueKind::AnySimple, ANY_SIMPLE_TYPE)
}

/// Attributes collected from declarations, references and attribute groups
#[derive(Debug, Default)]
struct AttributeSet {
    attributes: IndexMap<String, Arc<XsdAttribute>>,
    any_attribute: bool,
}

/// Links registered nodes into schema components
struct SchemaBuilder<'r> {
    registry: &'r Registry,
    simple_types: HashMap<String, Arc<XsdSimpleType>>,
    complex_types: HashMap<String, Arc<XsdComplexType>>,
    attribute_groups: HashMap<String, Arc<AttributeSet>>,
    in_progress: HashSet<String>,
}

impl<'r> SchemaBuilder<'r> {
    fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            simple_types: HashMap::new(),
            complex_types: HashMap::new(),
            attribute_groups: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn build(mut self, target_namespace: Option<String>) -> Result<XsdSchema> {
        let registry = self.registry;
        let mut schema = XsdSchema::new();
        schema.target_namespace = target_namespace;

        for (name, global) in &registry.simple_types {
            let qname = QName::new(global.namespace.clone(), name.clone());
            let simple_type = self.simple_type_named(&qname)?;
            schema.simple_types.insert(name.clone(), simple_type);
        }

        for (name, global) in &registry.complex_types {
            let qname = QName::new(global.namespace.clone(), name.clone());
            let complex_type = self.complex_type_named(&qname)?;
            schema.complex_types.insert(name.clone(), complex_type);
        }

        for (name, global) in &registry.groups {
            let qname = QName::new(global.namespace.clone(), name.clone());
            let group = self.build_group(qname, &global.node)?;
            schema.groups.insert(name.clone(), Arc::new(group));
        }

        for (qname, global) in &registry.elements {
            let element = self.build_element(&global.node, true)?;
            schema.elements.insert(qname.clone(), Arc::new(element));
        }

        debug!(
            groups = schema.groups.len(),
            complex_types = schema.complex_types.len(),
            simple_types = schema.simple_types.len(),
            elements = schema.elements.len();
            "Schema components linked"
        );

        Ok(schema)
    }

    fn enter(&mut self, key: String) -> Result<()> {
        if !self.in_progress.insert(key.clone()) {
            return Err(ParseError::new(format!("Circular definition of {}", key)).into());
        }
        Ok(())
    }

    fn leave(&mut self, key: &str) {
        self.in_progress.remove(key);
    }

    fn simple_type_named(&mut self, qname: &QName) -> Result<Arc<XsdSimpleType>> {
        if qname.is_xsd() {
            return XsdSimpleType::builtin(&qname.local_name)
                .map(Arc::new)
                .ok_or_else(|| {
                    ParseError::new(format!(
                        "Unknown XSD built-in simple type '{}'",
                        qname.local_name
                    ))
                    .into()
                });
        }

        let local = &qname.local_name;
        if let Some(simple_type) = self.simple_types.get(local) {
            return Ok(Arc::clone(simple_type));
        }

        let registry = self.registry;
        let global = registry
            .simple_types
            .get(local)
            .ok_or_else(|| ParseError::new(format!("Unknown simple type '{}'", qname)))?;

        let key = format!("simpleType '{}'", local);
        self.enter(key.clone())?;
        let name = QName::new(global.namespace.clone(), local.clone());
        let simple_type = Arc::new(self.build_simple_type(&global.node, Some(name))?);
        self.leave(&key);

        self.simple_types
            .insert(local.clone(), Arc::clone(&simple_type));
        Ok(simple_type)
    }

    fn inline_simple_type(&mut self, node: &Element) -> Result<Option<Arc<XsdSimpleType>>> {
        match node
            .children
            .iter()
            .find(|c| c.local_name() == tags::SIMPLE_TYPE)
        {
            Some(child) => Ok(Some(Arc::new(self.build_simple_type(child, None)?))),
            None => Ok(None),
        }
    }

    fn build_simple_type(&mut self, node: &Element, name: Option<QName>) -> Result<XsdSimpleType> {
        for child in &node.children {
            let variety = match child.local_name() {
                tags::RESTRICTION => {
                    let base = match child.get_attribute(attrs::BASE) {
                        Some(base) => self.simple_type_named(&child.resolve_qname(base)?)?,
                        None => self
                            .inline_simple_type(child)?
                            .unwrap_or_else(any_simple_type),
                    };
                    SimpleVariety::Restriction {
                        base,
                        enumeration: enumeration_facets(child),
                    }
                }
                tags::LIST => {
                    let item = match child.get_attribute(attrs::ITEM_TYPE) {
                        Some(item) => self.simple_type_named(&child.resolve_qname(item)?)?,
                        None => self
                            .inline_simple_type(child)?
                            .unwrap_or_else(any_simple_type),
                    };
                    SimpleVariety::List { item }
                }
                tags::UNION => {
                    let mut members = Vec::new();
                    if let Some(member_types) = child.get_attribute(attrs::MEMBER_TYPES) {
                        for member in member_types.split_whitespace() {
                            members.push(self.simple_type_named(&child.resolve_qname(member)?)?);
                        }
                    }
                    for inline in child.find_children(tags::SIMPLE_TYPE) {
                        members.push(Arc::new(self.build_simple_type(inline, None)?));
                    }
                    if members.is_empty() {
                        return Err(ParseError::new("Union without member types")
                            .with_source(node.to_xml())
                            .into());
                    }
                    SimpleVariety::Union { members }
                }
                tags::ANNOTATION => continue,
                other => {
                    return Err(ParseError::new(format!("Unexpected '{}' in simpleType", other))
                        .with_source(node.to_xml())
                        .into())
                }
            };
            return Ok(XsdSimpleType {
                name,
                variety,
                definition: node.to_xml(),
            });
        }

        Err(ParseError::new("simpleType without restriction, list or union")
            .with_source(node.to_xml())
            .into())
    }

    fn build_attribute(&mut self, node: &Element) -> Result<Arc<XsdAttribute>> {
        let registry = self.registry;
        let use_mode = node
            .get_attribute(attrs::USE)
            .map(AttributeUse::parse)
            .transpose()?
            .unwrap_or_default();

        let (decl, name) = match node.get_attribute(attrs::REF) {
            Some(reference) => {
                let qname = node.resolve_qname(reference)?;
                match registry.attributes.get(&qname.local_name) {
                    Some(global) => (&global.node, qname.local_name),
                    None if qname.namespace.as_deref() == Some(XML_NAMESPACE) => {
                        // xml:lang and friends without an imported xml.xsd
                        return Ok(Arc::new(XsdAttribute {
                            name: qname.local_name,
                            value_type: builtin_simple_type(ValueKind::String, "string"),
                            use_mode,
                            default: None,
                            fixed: None,
                        }));
                    }
                    None => {
                        return Err(ParseError::new(format!(
                            "Unknown attribute reference '{}'",
                            qname
                        ))
                        .into())
                    }
                }
            }
            None => {
                let name = node.get_attribute(attrs::NAME).ok_or_else(|| {
                    ParseError::new("Attribute missing 'name' attribute").with_source(node.to_xml())
                })?;
                (node, name.to_string())
            }
        };

        let value_type = match decl.get_attribute(attrs::TYPE) {
            Some(type_name) => self.simple_type_named(&decl.resolve_qname(type_name)?)?,
            None => self
                .inline_simple_type(decl)?
                .unwrap_or_else(any_simple_type),
        };

        let default = node
            .get_attribute(attrs::DEFAULT)
            .or_else(|| decl.get_attribute(attrs::DEFAULT))
            .map(str::to_string);
        let fixed = node
            .get_attribute(attrs::FIXED)
            .or_else(|| decl.get_attribute(attrs::FIXED))
            .map(str::to_string);

        Ok(Arc::new(XsdAttribute {
            name,
            value_type,
            use_mode,
            default,
            fixed,
        }))
    }

    fn collect_attributes(&mut self, node: &Element, set: &mut AttributeSet) -> Result<()> {
        for child in &node.children {
            match child.local_name() {
                tags::ATTRIBUTE => {
                    if child.get_attribute(attrs::USE) == Some("prohibited") {
                        let name = child
                            .get_attribute(attrs::NAME)
                            .or_else(|| child.get_attribute(attrs::REF))
                            .map(|n| n.rsplit(':').next().unwrap_or(n));
                        if let Some(name) = name {
                            set.attributes.shift_remove(name);
                        }
                        continue;
                    }
                    let attribute = self.build_attribute(child)?;
                    set.attributes.insert(attribute.name.clone(), attribute);
                }
                tags::ATTRIBUTE_GROUP => {
                    let reference = child.get_attribute(attrs::REF).ok_or_else(|| {
                        ParseError::new("Nested attributeGroup must be a reference")
                            .with_source(child.to_xml())
                    })?;
                    let group = self.attribute_group_named(&child.resolve_qname(reference)?)?;
                    for (name, attribute) in &group.attributes {
                        set.attributes.insert(name.clone(), Arc::clone(attribute));
                    }
                    set.any_attribute |= group.any_attribute;
                }
                tags::ANY_ATTRIBUTE => set.any_attribute = true,
                _ => {}
            }
        }
        Ok(())
    }

    fn attribute_group_named(&mut self, qname: &QName) -> Result<Arc<AttributeSet>> {
        let local = &qname.local_name;
        if let Some(group) = self.attribute_groups.get(local) {
            return Ok(Arc::clone(group));
        }

        let registry = self.registry;
        let global = registry
            .attribute_groups
            .get(local)
            .ok_or_else(|| ParseError::new(format!("Unknown attribute group '{}'", qname)))?;

        let key = format!("attributeGroup '{}'", local);
        self.enter(key.clone())?;
        let mut set = AttributeSet::default();
        self.collect_attributes(&global.node, &mut set)?;
        self.leave(&key);

        let set = Arc::new(set);
        self.attribute_groups.insert(local.clone(), Arc::clone(&set));
        Ok(set)
    }

    fn build_model_group(&mut self, node: &Element) -> Result<ModelGroup> {
        let model = ModelType::from_tag(node.local_name()).ok_or_else(|| {
            ParseError::new(format!("'{}' is not a compositor", node.local_name()))
        })?;
        let mut group = ModelGroup::new(model);
        group.occurs = parse_occurs(node)?;

        for child in &node.children {
            let particle = match child.local_name() {
                tags::ELEMENT => match child.get_attribute(attrs::REF) {
                    Some(reference) => Particle::ElementRef {
                        name: child.resolve_qname(reference)?,
                        occurs: parse_occurs(child)?,
                    },
                    None => Particle::Element(Arc::new(self.build_element(child, false)?)),
                },
                tags::GROUP => {
                    let reference = child.get_attribute(attrs::REF).ok_or_else(|| {
                        ParseError::new("Nested group must be a reference")
                            .with_source(child.to_xml())
                    })?;
                    Particle::GroupRef {
                        name: child.resolve_qname(reference)?,
                        occurs: parse_occurs(child)?,
                    }
                }
                tags::SEQUENCE | tags::CHOICE | tags::ALL => {
                    Particle::Model(self.build_model_group(child)?)
                }
                tags::ANY => Particle::Any {
                    namespace: child
                        .get_attribute(attrs::NAMESPACE)
                        .unwrap_or("##any")
                        .to_string(),
                    occurs: parse_occurs(child)?,
                },
                tags::ANNOTATION => continue,
                other => {
                    return Err(ParseError::new(format!(
                        "Unexpected '{}' in {} content model",
                        other,
                        node.local_name()
                    ))
                    .with_source(node.to_xml())
                    .into())
                }
            };
            group.particles.push(particle);
        }

        Ok(group)
    }

    /// Content model declared directly under a complex type or derivation
    fn content_model(&mut self, node: &Element) -> Result<Option<ModelGroup>> {
        for child in &node.children {
            match child.local_name() {
                tags::SEQUENCE | tags::CHOICE | tags::ALL => {
                    return Ok(Some(self.build_model_group(child)?));
                }
                tags::GROUP => {
                    let reference = child.get_attribute(attrs::REF).ok_or_else(|| {
                        ParseError::new("Content model group must be a reference")
                            .with_source(child.to_xml())
                    })?;
                    let mut group = ModelGroup::new(ModelType::Sequence);
                    group.particles.push(Particle::GroupRef {
                        name: child.resolve_qname(reference)?,
                        occurs: parse_occurs(child)?,
                    });
                    return Ok(Some(group));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn complex_type_named(&mut self, qname: &QName) -> Result<Arc<XsdComplexType>> {
        if qname.is_xsd() && qname.local_name == ANY_TYPE {
            return Ok(Arc::new(XsdComplexType::any_type()));
        }

        let local = &qname.local_name;
        if let Some(complex_type) = self.complex_types.get(local) {
            return Ok(Arc::clone(complex_type));
        }

        let registry = self.registry;
        let global = registry
            .complex_types
            .get(local)
            .ok_or_else(|| ParseError::new(format!("Unknown complex type '{}'", qname)))?;

        let key = format!("complexType '{}'", local);
        self.enter(key.clone())?;
        let name = QName::new(global.namespace.clone(), local.clone());
        let complex_type = Arc::new(self.build_complex_type(&global.node, Some(name))?);
        self.leave(&key);

        self.complex_types
            .insert(local.clone(), Arc::clone(&complex_type));
        Ok(complex_type)
    }

    fn build_complex_type(&mut self, node: &Element, name: Option<QName>) -> Result<XsdComplexType> {
        let mut complex_type = XsdComplexType {
            name,
            mixed: node.get_attribute(attrs::MIXED) == Some("true"),
            content: ComplexContent::Empty,
            attributes: IndexMap::new(),
            any_attribute: false,
            base: None,
            derivation: None,
            definition: node.to_xml(),
        };
        let mut set = AttributeSet::default();

        let derived = node
            .children
            .iter()
            .find(|c| matches!(c.local_name(), tags::COMPLEX_CONTENT | tags::SIMPLE_CONTENT));

        match derived {
            Some(content) => {
                if content.get_attribute(attrs::MIXED) == Some("true") {
                    complex_type.mixed = true;
                }
                let derivation = content
                    .children
                    .iter()
                    .find(|c| matches!(c.local_name(), tags::EXTENSION | tags::RESTRICTION))
                    .ok_or_else(|| {
                        ParseError::new(format!(
                            "{} without extension or restriction",
                            content.local_name()
                        ))
                        .with_source(node.to_xml())
                    })?;
                let method = if derivation.local_name() == tags::EXTENSION {
                    DerivationMethod::Extension
                } else {
                    DerivationMethod::Restriction
                };
                let base_name = derivation.get_attribute(attrs::BASE).ok_or_else(|| {
                    ParseError::new("Derivation missing 'base' attribute").with_source(node.to_xml())
                })?;
                let base = derivation.resolve_qname(base_name)?;

                if content.local_name() == tags::SIMPLE_CONTENT {
                    let simple = self.simple_content_type(&base, derivation, &mut set)?;
                    complex_type.content = ComplexContent::Simple(simple);
                } else {
                    let base_type = self.complex_type_named(&base)?;
                    for (attr_name, attribute) in &base_type.attributes {
                        set.attributes.insert(attr_name.clone(), Arc::clone(attribute));
                    }
                    let own = self.content_model(derivation)?;
                    complex_type.content = match method {
                        DerivationMethod::Extension => {
                            set.any_attribute |= base_type.any_attribute;
                            extend_content(&base_type, own)
                        }
                        DerivationMethod::Restriction => match own {
                            Some(group) => ComplexContent::Group(group),
                            None => ComplexContent::Empty,
                        },
                    };
                }

                self.collect_attributes(derivation, &mut set)?;
                complex_type.base = Some(base);
                complex_type.derivation = Some(method);
            }
            None => {
                if let Some(group) = self.content_model(node)? {
                    complex_type.content = ComplexContent::Group(group);
                }
                self.collect_attributes(node, &mut set)?;
            }
        }

        complex_type.attributes = set.attributes;
        complex_type.any_attribute = set.any_attribute;
        Ok(complex_type)
    }

    fn simple_content_type(
        &mut self,
        base: &QName,
        derivation: &Element,
        set: &mut AttributeSet,
    ) -> Result<Arc<XsdSimpleType>> {
        let registry = self.registry;
        let base_simple = if base.is_xsd() || registry.simple_types.contains_key(&base.local_name) {
            self.simple_type_named(base)?
        } else {
            let base_type = self.complex_type_named(base)?;
            for (name, attribute) in &base_type.attributes {
                set.attributes.insert(name.clone(), Arc::clone(attribute));
            }
            match &base_type.content {
                ComplexContent::Simple(simple) => Arc::clone(simple),
                _ => any_simple_type(),
            }
        };

        if derivation.local_name() == tags::RESTRICTION {
            let enumeration = enumeration_facets(derivation);
            if !enumeration.is_empty() {
                return Ok(Arc::new(XsdSimpleType {
                    name: None,
                    variety: SimpleVariety::Restriction {
                        base: base_simple,
                        enumeration,
                    },
                    definition: derivation.to_xml(),
                }));
            }
        }

        Ok(base_simple)
    }

    fn build_element(&mut self, node: &Element, global: bool) -> Result<XsdElement> {
        let name = node.get_attribute(attrs::NAME).ok_or_else(|| {
            ParseError::new("Element missing 'name' attribute").with_source(node.to_xml())
        })?;

        let type_ref = if let Some(type_name) = node.get_attribute(attrs::TYPE) {
            ElementTypeRef::Named(node.resolve_qname(type_name)?)
        } else if let Some(inline) = node
            .children
            .iter()
            .find(|c| c.local_name() == tags::COMPLEX_TYPE)
        {
            ElementTypeRef::Inline(XsdType::Complex(Arc::new(
                self.build_complex_type(inline, None)?,
            )))
        } else if let Some(inline) = self.inline_simple_type(node)? {
            ElementTypeRef::Inline(XsdType::Simple(inline))
        } else {
            ElementTypeRef::Named(QName::namespaced(XSD_NAMESPACE, ANY_TYPE))
        };

        let occurs = if global {
            Occurs::ONCE
        } else {
            parse_occurs(node)?
        };

        Ok(XsdElement {
            name: name.to_string(),
            type_ref,
            occurs,
            nillable: node.get_attribute(attrs::NILLABLE) == Some("true"),
            definition: node.to_xml(),
        })
    }

    fn build_group(&mut self, name: QName, node: &Element) -> Result<XsdGroup> {
        let model = match node
            .children
            .iter()
            .find(|c| ModelType::from_tag(c.local_name()).is_some())
        {
            Some(compositor) => self.build_model_group(compositor)?,
            None => ModelGroup::default(),
        };

        Ok(XsdGroup {
            name,
            model,
            definition: node.to_xml(),
        })
    }
}

/// Content of an extension: the base particles followed by the new ones
fn extend_content(base: &XsdComplexType, own: Option<ModelGroup>) -> ComplexContent {
    match (base.model_group(), own) {
        (Some(base_group), Some(own)) if !base_group.is_empty() => {
            let mut merged = ModelGroup::new(ModelType::Sequence);
            merged.particles.push(Particle::Model(base_group.clone()));
            merged.particles.push(Particle::Model(own));
            ComplexContent::Group(merged)
        }
        (Some(base_group), None) => ComplexContent::Group(base_group.clone()),
        (_, Some(own)) => ComplexContent::Group(own),
        (None, None) => base.content.clone(),
    }
}
