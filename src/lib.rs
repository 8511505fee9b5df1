//! # xsdclass
//!
//! Derive class specifications from XML Schema documents.
//!
//! A schema is read into raw constructs ([`xsd`]), compiled into a
//! [`ResolutionCache`] of groups, named types and elements ([`model`]),
//! and every cached entity is then turned into a [`ClassSpec`]: its
//! supertypes, its attributes split into simple, enum and bool accessors,
//! its child elements split into any, complex, placeholder and simple
//! accessors, plus filtered collection accessors for children whose type
//! carries enumerated attributes.
//!
//! ## Features
//!
//! - Recursive and mutually recursive groups and types
//! - Includes and imports resolved from the local file system
//! - Element identity keyed by name and type name
//! - Pluralized accessor names for enum-discriminated collections
//! - JSON specification document, one section per schema
//!
//! ## Example
//!
//! ```rust,ignore
//! use xsdclass::{ClassSpecBuilder, ResolutionCache, Schema};
//!
//! let mut cache = ResolutionCache::new();
//! {
//!     let mut schema = Schema::from_file("compound.xsd", &mut cache)?;
//!     schema.compile();
//! }
//!
//! let builder = ClassSpecBuilder::new(&cache);
//! for group in cache.groups() {
//!     let spec = builder.build_group(group)?;
//!     println!("{} extends {:?}", spec.name, spec.extends);
//! }
//! ```

#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod namespaces;
pub mod documents;

// Raw schema constructs
pub mod xsd;

// Type model and resolution
pub mod model;
pub mod cache;
pub mod schema;

// Class specifications
pub mod builder;
pub mod accessors;
pub mod document;
pub mod generator;

// Re-exports for convenience
pub use accessors::{Accessor, AccessorKind};
pub use builder::{BuildOptions, ClassSpec, ClassSpecBuilder, CollectionSpec, FilterGroup};
pub use cache::ResolutionCache;
pub use document::{SchemaSpec, SpecDocument};
pub use error::{Error, Result};
pub use generator::SpecGenerator;
pub use model::{ComponentKind, Element, ElementKey, Group, NamedType, TypeBinding};
pub use schema::Schema;
pub use xsd::XsdSchema;

/// Version of the xsdclass library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
