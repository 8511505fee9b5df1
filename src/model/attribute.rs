use indexmap::IndexMap;
use std::sync::Arc;

use crate::xsd::{AttributeUse, ValueKind, XsdAttribute, XsdComplexType, XsdSimpleType};

/// An attribute of an element or named type
#[derive(Debug, Clone)]
pub struct Attribute {
    name: String,
    value_type: Arc<XsdSimpleType>,
    required: bool,
    default: Option<String>,
    fixed: Option<String>,
    enum_values: Vec<String>,
}

impl Attribute {
    /// Wrap an attribute declaration
    pub fn from_xsd(attribute: &XsdAttribute) -> Self {
        Self {
            name: attribute.name.clone(),
            value_type: Arc::clone(&attribute.value_type),
            required: attribute.use_mode == AttributeUse::Required,
            default: attribute.default.clone(),
            fixed: attribute.fixed.clone(),
            enum_values: enum_values_of(&attribute.value_type),
        }
    }

    /// Local name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Linked value type
    pub fn value_type(&self) -> &XsdSimpleType {
        &self.value_type
    }

    /// Local name of the value type (None when anonymous)
    pub fn type_name(&self) -> Option<&str> {
        self.value_type.local_name()
    }

    /// Built-in family the value type derives from
    pub fn value_kind(&self) -> ValueKind {
        self.value_type.root_kind()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_optional(&self) -> bool {
        !self.required
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn fixed_value(&self) -> Option<&str> {
        self.fixed.as_deref()
    }

    /// Legal values when the type is an enumeration, otherwise empty
    pub fn enum_values(&self) -> &[String] {
        &self.enum_values
    }

    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }

    pub fn is_bool(&self) -> bool {
        self.value_kind() == ValueKind::Boolean
    }
}

/// Attributes of a complex type, in declaration order
pub(crate) fn attributes_of(complex_type: &XsdComplexType) -> IndexMap<String, Attribute> {
    complex_type
        .attributes
        .iter()
        .map(|(name, attribute)| (name.clone(), Attribute::from_xsd(attribute)))
        .collect()
}

/// Unions take the enumeration of their first restriction member.
/// An enumeration holding only the empty string counts as none.
fn enum_values_of(value_type: &XsdSimpleType) -> Vec<String> {
    let resolved = if value_type.is_union() {
        value_type.first_restriction_member()
    } else if value_type.is_restriction() {
        Some(value_type)
    } else {
        None
    };

    match resolved.map(XsdSimpleType::enumeration) {
        Some([only]) if only.is_empty() => Vec::new(),
        Some(values) => values.to_vec(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xsd::SimpleVariety;

    fn restriction(values: &[&str]) -> Arc<XsdSimpleType> {
        Arc::new(XsdSimpleType {
            name: None,
            variety: SimpleVariety::Restriction {
                base: Arc::new(XsdSimpleType::builtin("string").unwrap()),
                enumeration: values.iter().map(|v| v.to_string()).collect(),
            },
            definition: String::new(),
        })
    }

    fn attribute(value_type: Arc<XsdSimpleType>, use_mode: AttributeUse) -> Attribute {
        Attribute::from_xsd(&XsdAttribute {
            name: "kind".to_string(),
            value_type,
            use_mode,
            default: None,
            fixed: None,
        })
    }

    #[test]
    fn test_enum_attribute() {
        let attr = attribute(restriction(&["function", "variable"]), AttributeUse::Required);
        assert!(attr.is_enum());
        assert!(attr.is_required());
        assert_eq!(attr.enum_values(), ["function", "variable"]);
        assert_eq!(attr.value_kind(), ValueKind::String);
    }

    #[test]
    fn test_empty_string_enumeration_is_not_an_enum() {
        let attr = attribute(restriction(&[""]), AttributeUse::Optional);
        assert!(!attr.is_enum());
        assert!(attr.is_optional());
    }

    #[test]
    fn test_union_uses_first_restriction_member() {
        let union = Arc::new(XsdSimpleType {
            name: None,
            variety: SimpleVariety::Union {
                members: vec![
                    Arc::new(XsdSimpleType::builtin("integer").unwrap()),
                    restriction(&["auto"]),
                ],
            },
            definition: String::new(),
        });
        let attr = attribute(union, AttributeUse::Optional);
        assert_eq!(attr.enum_values(), ["auto"]);
    }

    #[test]
    fn test_boolean_attribute() {
        let attr = attribute(
            Arc::new(XsdSimpleType::builtin("boolean").unwrap()),
            AttributeUse::Optional,
        );
        assert!(attr.is_bool());
        assert!(!attr.is_enum());
        assert_eq!(attr.type_name(), Some("boolean"));
    }
}
