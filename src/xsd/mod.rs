//! XML Schema reader
//!
//! Parses XSD documents (with their includes and imports) into linked
//! schema components and exposes them by name.

pub mod builtins;
pub mod components;
mod parsing;
pub mod schema;

pub use builtins::{builtin_kind, is_builtin, ValueKind, ANY_SIMPLE_TYPE, ANY_TYPE};
pub use components::{
    AttributeUse, ComplexContent, ContentType, DerivationMethod, ElementTypeRef, ModelGroup,
    ModelType, Occurs, Particle, SimpleVariety, XsdAttribute, XsdComplexType, XsdElement,
    XsdGroup, XsdSimpleType, XsdType,
};
pub use schema::{ComponentSource, XsdSchema};
