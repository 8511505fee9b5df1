//! XSD schema components
//!
//! The parsed, linked form of the constructs the class-specification core
//! consumes. Simple types and attributes are fully linked. Element, group
//! and complex type references stay name references so that recursive
//! grammars can be represented without reference cycles.

use indexmap::IndexMap;
use std::sync::Arc;

use super::builtins::{builtin_kind, ValueKind, ANY_TYPE};
use crate::error::{ParseError, Result};
use crate::namespaces::{QName, XSD_NAMESPACE};

/// Occurrence constraints of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum occurrences
    pub min: u32,
    /// Maximum occurrences (None = unbounded)
    pub max: Option<u32>,
}

impl Occurs {
    /// Exactly once
    pub const ONCE: Occurs = Occurs { min: 1, max: Some(1) };

    /// Parse `minOccurs`/`maxOccurs` attribute values
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Result<Self> {
        let min = match min {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ParseError::new(format!("Invalid minOccurs value '{}'", v)))?,
            None => 1,
        };
        let max = match max.map(str::trim) {
            Some("unbounded") => None,
            Some(v) => Some(
                v.parse()
                    .map_err(|_| ParseError::new(format!("Invalid maxOccurs value '{}'", v)))?,
            ),
            None => Some(1),
        };
        Ok(Self { min, max })
    }

    /// Whether more than one occurrence is allowed
    pub fn is_multiple(&self) -> bool {
        self.max.map_or(true, |max| max > 1)
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::ONCE
    }
}

/// Variety of a simple type
#[derive(Debug, Clone)]
pub enum SimpleVariety {
    /// XSD built-in datatype
    Builtin(ValueKind),
    /// Restriction of a base type with an optional enumeration facet
    Restriction {
        /// Base type
        base: Arc<XsdSimpleType>,
        /// Values of the enumeration facet declared on this restriction
        enumeration: Vec<String>,
    },
    /// List of items
    List {
        /// Item type
        item: Arc<XsdSimpleType>,
    },
    /// Union of member types
    Union {
        /// Member types in declaration order
        members: Vec<Arc<XsdSimpleType>>,
    },
}

/// A simple type definition
#[derive(Debug, Clone)]
pub struct XsdSimpleType {
    /// Type name (None for anonymous types)
    pub name: Option<QName>,
    /// Variety and linked components
    pub variety: SimpleVariety,
    /// Definition as written in the schema (empty for built-ins)
    pub definition: String,
}

impl XsdSimpleType {
    /// Built-in simple type for a local name in the XSD namespace
    pub fn builtin(local_name: &str) -> Option<Self> {
        builtin_kind(local_name).map(|kind| Self {
            name: Some(QName::namespaced(XSD_NAMESPACE, local_name)),
            variety: SimpleVariety::Builtin(kind),
            definition: String::new(),
        })
    }

    /// Local name of this type
    pub fn local_name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.local_name.as_str())
    }

    /// Whether this type restricts a base type
    pub fn is_restriction(&self) -> bool {
        matches!(self.variety, SimpleVariety::Restriction { .. })
    }

    /// Whether this type is a union
    pub fn is_union(&self) -> bool {
        matches!(self.variety, SimpleVariety::Union { .. })
    }

    /// Whether this is an XSD built-in
    pub fn is_builtin(&self) -> bool {
        matches!(self.variety, SimpleVariety::Builtin(_))
    }

    /// Member types of a union (empty for other varieties)
    pub fn member_types(&self) -> &[Arc<XsdSimpleType>] {
        match &self.variety {
            SimpleVariety::Union { members } => members,
            _ => &[],
        }
    }

    /// First restriction among the members of a union, depth-first
    pub fn first_restriction_member(&self) -> Option<&XsdSimpleType> {
        self.member_types().iter().find_map(|member| {
            if member.is_restriction() {
                Some(member.as_ref())
            } else {
                member.first_restriction_member()
            }
        })
    }

    /// Value family of the built-in this type is ultimately derived from
    pub fn root_kind(&self) -> ValueKind {
        match &self.variety {
            SimpleVariety::Builtin(kind) => *kind,
            SimpleVariety::Restriction { base, .. } => base.root_kind(),
            SimpleVariety::List { .. } => ValueKind::List,
            SimpleVariety::Union { members } => self
                .first_restriction_member()
                .map(|m| m.root_kind())
                .or_else(|| members.first().map(|m| m.root_kind()))
                .unwrap_or(ValueKind::String),
        }
    }

    /// Effective enumeration facet; restrictions inherit their base's facet
    pub fn enumeration(&self) -> &[String] {
        match &self.variety {
            SimpleVariety::Restriction { enumeration, .. } if !enumeration.is_empty() => {
                enumeration
            }
            SimpleVariety::Restriction { base, .. } => base.enumeration(),
            _ => &[],
        }
    }
}

/// Attribute use mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeUse {
    /// Attribute may be omitted
    #[default]
    Optional,
    /// Attribute must be present
    Required,
    /// Attribute must not appear
    Prohibited,
}

impl AttributeUse {
    /// Parse the `use` attribute value
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "optional" => Ok(Self::Optional),
            "required" => Ok(Self::Required),
            "prohibited" => Ok(Self::Prohibited),
            other => Err(ParseError::new(format!("Invalid attribute use '{}'", other)).into()),
        }
    }
}

/// An attribute declaration
#[derive(Debug, Clone)]
pub struct XsdAttribute {
    /// Local name
    pub name: String,
    /// Linked value type
    pub value_type: Arc<XsdSimpleType>,
    /// Use mode
    pub use_mode: AttributeUse,
    /// Default value
    pub default: Option<String>,
    /// Fixed value
    pub fixed: Option<String>,
}

/// Model group compositor type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelType {
    /// Ordered sequence of particles
    #[default]
    Sequence,
    /// One of multiple alternatives
    Choice,
    /// Unordered set of particles
    All,
}

impl ModelType {
    /// Parse from element tag name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "sequence" => Some(Self::Sequence),
            "choice" => Some(Self::Choice),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// A particle of a content model
#[derive(Debug, Clone)]
pub enum Particle {
    /// Local element declaration
    Element(Arc<XsdElement>),
    /// Reference to a global element
    ElementRef {
        /// Referenced element
        name: QName,
        /// Occurrence constraints
        occurs: Occurs,
    },
    /// Reference to a named group
    GroupRef {
        /// Referenced group
        name: QName,
        /// Occurrence constraints
        occurs: Occurs,
    },
    /// Nested compositor
    Model(ModelGroup),
    /// Element wildcard (`xs:any`)
    Any {
        /// Namespace constraint as written
        namespace: String,
        /// Occurrence constraints
        occurs: Occurs,
    },
}

/// A compositor and its particles
#[derive(Debug, Clone, Default)]
pub struct ModelGroup {
    /// Compositor
    pub model: ModelType,
    /// Occurrence constraints
    pub occurs: Occurs,
    /// Particles in declaration order
    pub particles: Vec<Particle>,
}

impl ModelGroup {
    /// Create an empty model group
    pub fn new(model: ModelType) -> Self {
        Self {
            model,
            occurs: Occurs::ONCE,
            particles: Vec::new(),
        }
    }

    /// Whether no particle can ever appear
    pub fn is_empty(&self) -> bool {
        self.particles.iter().all(|p| match p {
            Particle::Model(group) => group.is_empty(),
            _ => false,
        })
    }
}

/// A named model group definition (`xs:group name="..."`)
#[derive(Debug, Clone)]
pub struct XsdGroup {
    /// Group name
    pub name: QName,
    /// Content model
    pub model: ModelGroup,
    /// Definition as written in the schema
    pub definition: String,
}

/// Content type of a complex type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// No text and no elements
    Empty,
    /// Text only
    Simple,
    /// Elements without intermingled text
    ElementOnly,
    /// Elements with intermingled text
    Mixed,
}

/// Content of a complex type
#[derive(Debug, Clone)]
pub enum ComplexContent {
    /// No content model
    Empty,
    /// Simple content of the given type
    Simple(Arc<XsdSimpleType>),
    /// Element content
    Group(ModelGroup),
}

/// Derivation method of a complex type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationMethod {
    /// Derived by extension
    Extension,
    /// Derived by restriction
    Restriction,
}

/// A complex type definition
#[derive(Debug, Clone)]
pub struct XsdComplexType {
    /// Type name (None for anonymous types)
    pub name: Option<QName>,
    /// Whether text may be intermingled with elements
    pub mixed: bool,
    /// Content
    pub content: ComplexContent,
    /// Attribute uses keyed by local name, including inherited ones
    pub attributes: IndexMap<String, Arc<XsdAttribute>>,
    /// Whether an attribute wildcard is present
    pub any_attribute: bool,
    /// Base type, if derived
    pub base: Option<QName>,
    /// Derivation method, if derived
    pub derivation: Option<DerivationMethod>,
    /// Definition as written in the schema
    pub definition: String,
}

impl XsdComplexType {
    /// The `xs:anyType` ur-type
    pub fn any_type() -> Self {
        Self {
            name: Some(QName::namespaced(XSD_NAMESPACE, ANY_TYPE)),
            mixed: true,
            content: ComplexContent::Group(ModelGroup::new(ModelType::Sequence)),
            attributes: IndexMap::new(),
            any_attribute: true,
            base: None,
            derivation: None,
            definition: String::new(),
        }
    }

    /// Local name of this type
    pub fn local_name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.local_name.as_str())
    }

    /// Content classification
    pub fn content_type(&self) -> ContentType {
        match &self.content {
            ComplexContent::Simple(_) => ContentType::Simple,
            ComplexContent::Group(group) if !group.is_empty() => {
                if self.mixed {
                    ContentType::Mixed
                } else {
                    ContentType::ElementOnly
                }
            }
            _ if self.mixed => ContentType::Mixed,
            _ => ContentType::Empty,
        }
    }

    /// Element content model, if any
    pub fn model_group(&self) -> Option<&ModelGroup> {
        match &self.content {
            ComplexContent::Group(group) => Some(group),
            _ => None,
        }
    }
}

/// A simple or complex type
#[derive(Debug, Clone)]
pub enum XsdType {
    /// Simple type
    Simple(Arc<XsdSimpleType>),
    /// Complex type
    Complex(Arc<XsdComplexType>),
}

impl XsdType {
    /// Qualified name of the type (None for anonymous types)
    pub fn name(&self) -> Option<&QName> {
        match self {
            Self::Simple(st) => st.name.as_ref(),
            Self::Complex(ct) => ct.name.as_ref(),
        }
    }

    /// Local name of the type (None for anonymous types)
    pub fn local_name(&self) -> Option<&str> {
        self.name().map(|n| n.local_name.as_str())
    }

    /// Definition as written in the schema
    pub fn definition(&self) -> &str {
        match self {
            Self::Simple(st) => &st.definition,
            Self::Complex(ct) => &ct.definition,
        }
    }

    /// Whether this is a simple type
    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple(_))
    }

    /// Whether this is a complex type
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_))
    }
}

/// How an element declaration names its type
#[derive(Debug, Clone)]
pub enum ElementTypeRef {
    /// Named type (`type="..."`, or `xs:anyType` when omitted)
    Named(QName),
    /// Anonymous type declared inline
    Inline(XsdType),
}

/// An element declaration
#[derive(Debug, Clone)]
pub struct XsdElement {
    /// Local name
    pub name: String,
    /// Type of the element
    pub type_ref: ElementTypeRef,
    /// Occurrence constraints (local declarations only)
    pub occurs: Occurs,
    /// Whether the element is nillable
    pub nillable: bool,
    /// Definition as written in the schema
    pub definition: String,
}

impl XsdElement {
    /// Local name of the element's type (None when the type is anonymous)
    pub fn type_name(&self) -> Option<&str> {
        match &self.type_ref {
            ElementTypeRef::Named(qname) => Some(qname.local_name.as_str()),
            ElementTypeRef::Inline(ty) => ty.local_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restriction(base: XsdSimpleType, values: &[&str]) -> XsdSimpleType {
        XsdSimpleType {
            name: None,
            variety: SimpleVariety::Restriction {
                base: Arc::new(base),
                enumeration: values.iter().map(|v| v.to_string()).collect(),
            },
            definition: String::new(),
        }
    }

    #[test]
    fn test_occurs_parse() {
        let occurs = Occurs::parse(Some("0"), Some("unbounded")).unwrap();
        assert_eq!(occurs, Occurs { min: 0, max: None });
        assert!(occurs.is_multiple());
        assert_eq!(Occurs::parse(None, None).unwrap(), Occurs::ONCE);
        assert!(Occurs::parse(Some("x"), None).is_err());
    }

    #[test]
    fn test_restriction_inherits_enumeration() {
        let string = XsdSimpleType::builtin("string").unwrap();
        let kinds = restriction(string, &["function", "variable"]);
        let narrowed = restriction(kinds, &[]);

        assert_eq!(narrowed.enumeration(), ["function", "variable"]);
        assert_eq!(narrowed.root_kind(), ValueKind::String);
    }

    #[test]
    fn test_union_uses_first_restriction_member_depth_first() {
        let integer = Arc::new(XsdSimpleType::builtin("integer").unwrap());
        let inner = XsdSimpleType {
            name: None,
            variety: SimpleVariety::Union {
                members: vec![
                    integer.clone(),
                    Arc::new(restriction(XsdSimpleType::builtin("token").unwrap(), &["auto"])),
                ],
            },
            definition: String::new(),
        };
        let outer = XsdSimpleType {
            name: None,
            variety: SimpleVariety::Union {
                members: vec![integer, Arc::new(inner)],
            },
            definition: String::new(),
        };

        let member = outer.first_restriction_member().unwrap();
        assert_eq!(member.enumeration(), ["auto"]);
        assert_eq!(outer.root_kind(), ValueKind::String);
    }

    #[test]
    fn test_content_type() {
        let mut ct = XsdComplexType::any_type();
        assert_eq!(ct.content_type(), ContentType::Mixed);

        ct.mixed = false;
        assert_eq!(ct.content_type(), ContentType::Empty);

        let mut group = ModelGroup::new(ModelType::Sequence);
        group.particles.push(Particle::Any {
            namespace: "##any".to_string(),
            occurs: Occurs::ONCE,
        });
        ct.content = ComplexContent::Group(group);
        assert_eq!(ct.content_type(), ContentType::ElementOnly);
    }
}
