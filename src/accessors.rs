//! Accessor declarations derived from a class specification
//!
//! Generated classes expose one zero-argument getter per attribute and
//! child element. Enum-discriminated collections get an unfiltered getter
//! named after the plural tag plus one filtered getter per literal.

use serde::{Deserialize, Serialize};

use crate::builder::{pluralize, AttributeCategory, ClassSpec, ElementCategory};

/// What an accessor reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    /// An attribute value
    Attribute,
    /// A single child element or its text
    Child,
    /// Every child with a tag
    Collection,
    /// Children with a tag and a discriminator value
    FilteredCollection,
}

/// One getter of a generated class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessor {
    /// Getter name
    pub name: String,
    pub kind: AccessorKind,
    /// Attribute or element name the getter reads
    pub target: String,
    /// Category of the attribute or element
    pub category: String,
    /// Child selection expression for collections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpath: Option<String>,
}

impl Accessor {
    fn attribute(name: &str, category: AttributeCategory) -> Self {
        Self {
            name: format!("get_{}", name),
            kind: AccessorKind::Attribute,
            target: name.to_string(),
            category: category.as_str().to_string(),
            xpath: None,
        }
    }

    fn child(name: &str, category: ElementCategory) -> Self {
        Self {
            name: format!("get_{}", name),
            kind: AccessorKind::Child,
            target: name.to_string(),
            category: category.as_str().to_string(),
            xpath: None,
        }
    }
}

impl ClassSpec {
    /// Accessors in emission order: attributes, plain children, then
    /// collections
    pub fn accessors(&self) -> Vec<Accessor> {
        let mut accessors: Vec<Accessor> = self
            .attributes
            .iter()
            .map(|(name, category)| Accessor::attribute(name, category))
            .collect();

        accessors.extend(
            self.elements
                .iter()
                .filter(|(name, _)| self.elements.collection(name).is_none())
                .map(|(name, category)| Accessor::child(name, category)),
        );

        for collection in &self.elements.collections {
            let tag = &collection.tag;
            accessors.push(Accessor {
                name: format!("get_{}", pluralize(tag)),
                kind: AccessorKind::Collection,
                target: tag.clone(),
                category: ElementCategory::Complex.as_str().to_string(),
                xpath: Some(tag.clone()),
            });

            for filter in &collection.filters {
                for (plural, literal) in &filter.values {
                    accessors.push(Accessor {
                        name: format!("get_{}_{}", tag, plural),
                        kind: AccessorKind::FilteredCollection,
                        target: tag.clone(),
                        category: ElementCategory::Complex.as_str().to_string(),
                        xpath: Some(format!("{}{}", tag, filter.predicate_for(literal))),
                    });
                }
            }
        }

        accessors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{AttributeSpecs, CollectionSpec, ElementSpecs, FilterGroup};
    use crate::model::ComponentKind;
    use pretty_assertions::assert_eq;

    fn sectiondef() -> ClassSpec {
        let mut elements = ElementSpecs::default();
        elements
            .complex
            .insert("memberdef".to_string(), "Memberdef".to_string());
        elements
            .complex
            .insert("description".to_string(), "descriptionType".to_string());
        elements.placeholder.push("hruler".to_string());

        let mut filter = FilterGroup::new("kind");
        filter
            .values
            .insert("functions".to_string(), "function".to_string());
        filter
            .values
            .insert("variables".to_string(), "variable".to_string());
        elements.collections.push(CollectionSpec {
            tag: "memberdef".to_string(),
            type_name: "Memberdef".to_string(),
            filters: vec![filter],
        });

        let mut attributes = AttributeSpecs::default();
        attributes.bools.push("static".to_string());

        ClassSpec {
            name: "Sectiondef".to_string(),
            category: ComponentKind::Group,
            extends: vec!["Node".to_string()],
            attributes,
            elements,
        }
    }

    #[test]
    fn test_accessor_names_and_order() {
        let names: Vec<_> = sectiondef()
            .accessors()
            .into_iter()
            .map(|a| a.name)
            .collect();

        assert_eq!(
            names,
            vec![
                "get_static",
                "get_description",
                "get_hruler",
                "get_memberdefs",
                "get_memberdef_functions",
                "get_memberdef_variables",
            ]
        );
    }

    #[test]
    fn test_collection_xpaths() {
        let accessors = sectiondef().accessors();

        let all = accessors
            .iter()
            .find(|a| a.kind == AccessorKind::Collection)
            .unwrap();
        assert_eq!(all.xpath.as_deref(), Some("memberdef"));

        let filtered: Vec<_> = accessors
            .iter()
            .filter(|a| a.kind == AccessorKind::FilteredCollection)
            .map(|a| a.xpath.as_deref().unwrap())
            .collect();
        assert_eq!(
            filtered,
            vec![
                "memberdef[@kind=\"function\"]",
                "memberdef[@kind=\"variable\"]"
            ]
        );
    }

    #[test]
    fn test_collection_tag_is_pluralized() {
        let mut spec = sectiondef();
        spec.elements.collections[0].tag = "entry".to_string();
        let accessors = spec.accessors();
        assert!(accessors.iter().any(|a| a.name == "get_entries"));
    }
}
