//! Class-specification builder
//!
//! Turns cached groups, named types and elements into [`ClassSpec`]s.
//! Every cross-reference must already be present in the
//! [`ResolutionCache`]; a build either returns a complete specification or
//! fails.

mod inflection;
mod naming;
mod spec;

pub use inflection::{plural_literal, pluralize};
pub use naming::{class_name, file_token};
pub use spec::{
    AttributeCategory, AttributeSpecs, ClassSpec, CollectionSpec, ElementCategory, ElementSpecs,
    FilterGroup,
};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::cache::ResolutionCache;
use crate::error::{Error, Result};
use crate::model::{Attribute, ComponentKind, Content, Element, Group, NamedType, TypeBinding};

/// Builder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Supertype of entities that reference no group
    pub base_class: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            base_class: "Node".to_string(),
        }
    }
}

/// Derives class specifications from cached entities
#[derive(Debug)]
pub struct ClassSpecBuilder<'a> {
    cache: &'a ResolutionCache,
    options: BuildOptions,
}

impl<'a> ClassSpecBuilder<'a> {
    /// Create a builder with default options
    pub fn new(cache: &'a ResolutionCache) -> Self {
        Self {
            cache,
            options: BuildOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Specification of a named group
    pub fn build_group(&self, group: &Group) -> Result<ClassSpec> {
        let entity = group.name();
        debug!(entity = entity; "Building group specification");

        Ok(ClassSpec {
            name: entity.to_string(),
            category: ComponentKind::Group,
            extends: self.supertypes(entity, group.content())?,
            attributes: AttributeSpecs::default(),
            elements: self.element_specs(entity, group.content())?,
        })
    }

    /// Specification of a named type
    pub fn build_type(&self, named_type: &NamedType) -> Result<ClassSpec> {
        let entity = named_type.local_name().ok_or_else(|| {
            Error::name_derivation("anonymous type", "a type specification needs a type name")
        })?;
        debug!(entity = entity; "Building type specification");

        Ok(ClassSpec {
            name: entity.to_string(),
            category: ComponentKind::Type,
            extends: self.supertypes(entity, named_type.content())?,
            attributes: attribute_specs(named_type.attributes()),
            elements: self.element_specs(entity, named_type.content())?,
        })
    }

    /// Specification of an element.
    ///
    /// An element with a named complex type extends that type. Otherwise
    /// the type's attributes and elements are inlined.
    pub fn build_element(&self, element: &Element) -> Result<ClassSpec> {
        let entity = element.name();
        debug!(entity = entity; "Building element specification");

        let named_type = self.resolve(entity, element)?;

        if let (TypeBinding::Named(type_name), true) = (element.binding(), named_type.is_complex()) {
            return Ok(ClassSpec {
                name: entity.to_string(),
                category: ComponentKind::Element,
                extends: vec![type_name.clone()],
                attributes: AttributeSpecs::default(),
                elements: ElementSpecs::default(),
            });
        }

        Ok(ClassSpec {
            name: entity.to_string(),
            category: ComponentKind::Element,
            extends: self.supertypes(entity, named_type.content())?,
            attributes: attribute_specs(element.attributes()),
            elements: self.element_specs(entity, named_type.content())?,
        })
    }

    fn resolve<'e>(&'e self, entity: &str, element: &'e Element) -> Result<&'e NamedType> {
        element.resolve_type(self.cache).ok_or_else(|| {
            Error::unresolved(
                entity,
                format!("type '{}'", element.type_name().unwrap_or("<anonymous>")),
            )
        })
    }

    /// Referenced groups, or the base class when there are none
    fn supertypes(&self, entity: &str, content: &Content) -> Result<Vec<String>> {
        if content.groups.is_empty() {
            return Ok(vec![self.options.base_class.clone()]);
        }

        content
            .groups
            .iter()
            .map(|group| {
                if self.cache.contains_group(group) {
                    Ok(group.clone())
                } else {
                    Err(Error::unresolved(entity, format!("group '{}'", group)))
                }
            })
            .collect()
    }

    fn element_specs(&self, entity: &str, content: &Content) -> Result<ElementSpecs> {
        if let Some(unhandled) = content.unhandled.first() {
            return Err(Error::build_contract(
                entity,
                format!("no categorization rule for {}", unhandled),
            ));
        }

        let mut specs = ElementSpecs::default();
        for (name, key) in &content.elements {
            let element = self
                .cache
                .element(key)
                .ok_or_else(|| Error::unresolved(entity, format!("element '{}'", key)))?;
            let child_type = self.resolve(entity, element)?;

            if child_type.is_any_type() {
                specs.any.push(name.clone());
            } else if child_type.is_placeholder() {
                specs.placeholder.push(name.clone());
            } else if child_type.is_simple() {
                let kind = child_type.value_kind().ok_or_else(|| {
                    Error::build_contract(entity, format!("simple element '{}' has no value kind", name))
                })?;
                specs.simple.insert(name.clone(), kind.as_str().to_string());
            } else {
                let type_name = child_type
                    .local_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| class_name(name));
                specs.complex.insert(name.clone(), type_name);

                if child_type.has_enum_attributes() {
                    specs
                        .collections
                        .push(collection_spec(entity, name, child_type)?);
                }
            }
        }

        Ok(specs)
    }
}

/// Attributes split into simple, enum and bool
fn attribute_specs(attributes: &IndexMap<String, Attribute>) -> AttributeSpecs {
    let mut specs = AttributeSpecs::default();
    for (name, attribute) in attributes {
        if attribute.is_enum() {
            specs
                .enums
                .insert(name.clone(), attribute.enum_values().to_vec());
        } else if attribute.is_bool() {
            specs.bools.push(name.clone());
        } else {
            specs
                .simple
                .insert(name.clone(), attribute.value_kind().as_str().to_string());
        }
    }
    specs
}

fn collection_spec(entity: &str, tag: &str, child_type: &NamedType) -> Result<CollectionSpec> {
    let type_name = child_type.local_name().ok_or_else(|| {
        Error::name_derivation(
            entity,
            format!("type of collection element '{}' has no local name", tag),
        )
    })?;

    let mut filters = Vec::new();
    for attribute in child_type.attributes().values().filter(|a| a.is_enum()) {
        let mut filter = FilterGroup::new(attribute.name());
        for literal in attribute.enum_values() {
            let plural = plural_literal(literal).map_err(|_| {
                Error::name_derivation(
                    entity,
                    format!(
                        "cannot derive an accessor name from '{}' value '{}' of '{}'",
                        attribute.name(),
                        literal,
                        tag
                    ),
                )
            })?;
            filter.values.insert(plural, literal.clone());
        }
        filters.push(filter);
    }

    Ok(CollectionSpec {
        tag: tag.to_string(),
        type_name: type_name.to_string(),
        filters,
    })
}
