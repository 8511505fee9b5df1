//! Batch driver
//!
//! Processes schema files strictly one after the other. Each schema gets a
//! cleared cache, is compiled, and every group, complex type and global
//! element is turned into a class specification stored in the document
//! under the schema's file stem.

use log::{error, info};
use std::path::{Path, PathBuf};

use crate::builder::{BuildOptions, ClassSpecBuilder};
use crate::cache::ResolutionCache;
use crate::document::{SchemaSpec, SpecDocument};
use crate::error::{Error, Result};
use crate::model::ElementKey;
use crate::schema::Schema;
use crate::xsd::XsdSchema;

/// Derives specification documents from schema files
#[derive(Debug)]
pub struct SpecGenerator {
    output: PathBuf,
    options: BuildOptions,
    cache: ResolutionCache,
}

impl SpecGenerator {
    /// Generator writing to the given document path
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            options: BuildOptions::default(),
            cache: ResolutionCache::new(),
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Process every input in order, saving the document after each one.
    ///
    /// The first failing schema aborts the run; sections written for
    /// earlier inputs stay saved.
    pub fn generate<P: AsRef<Path>>(&mut self, inputs: &[P]) -> Result<SpecDocument> {
        let mut document = SpecDocument::load(&self.output)?;

        for input in inputs {
            let input = input.as_ref();
            let name = schema_name(input)?;
            info!(schema = name.as_str(); "Generating specifications from {}", input.display());

            let spec = XsdSchema::from_file(input)
                .and_then(|xsd| self.derive(xsd))
                .map_err(|e| {
                    error!(schema = name.as_str(); "Generation failed: {}", e);
                    e
                })?;
            info!(
                schema = name.as_str(),
                groups = spec.groups.len(),
                types = spec.types.len(),
                elements = spec.elements.len();
                "Derived class specifications"
            );

            document.replace_schema(name, spec);
            document.save(&self.output)?;
        }

        Ok(document)
    }

    /// Derive the specifications of one loaded schema
    pub fn derive(&mut self, xsd: XsdSchema) -> Result<SchemaSpec> {
        self.cache.clear();

        let globals: Vec<ElementKey> = xsd.elements().map(|e| ElementKey::of(e)).collect();
        {
            let mut schema = Schema::new(xsd, &mut self.cache);
            schema.compile();
        }

        let cache = &self.cache;
        let builder = ClassSpecBuilder::new(cache).with_options(self.options.clone());

        let groups = cache
            .groups()
            .map(|group| builder.build_group(group))
            .collect::<Result<Vec<_>>>()?;
        let types = cache
            .types()
            .filter(|named_type| named_type.is_complex())
            .map(|named_type| builder.build_type(named_type))
            .collect::<Result<Vec<_>>>()?;
        let elements = globals
            .iter()
            .filter_map(|key| cache.element(key))
            .map(|element| builder.build_element(element))
            .collect::<Result<Vec<_>>>()?;

        Ok(SchemaSpec {
            groups,
            types,
            elements,
        })
    }
}

/// Schema name: the input's file stem
fn schema_name(input: &Path) -> Result<String> {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::Resource(format!("Cannot derive a schema name from '{}'", input.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_name_is_file_stem() {
        assert_eq!(schema_name(Path::new("xml/compound.xsd")).unwrap(), "compound");
        assert!(schema_name(Path::new("/")).is_err());
    }

    #[test]
    fn test_derive_clears_previous_schema() {
        let mut generator = SpecGenerator::new("unused.json");

        let first = XsdSchema::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="first"/>
               </xs:schema>"#,
        )
        .unwrap();
        let second = XsdSchema::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="second"/>
               </xs:schema>"#,
        )
        .unwrap();

        generator.derive(first).unwrap();
        let spec = generator.derive(second).unwrap();
        let names: Vec<_> = spec.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["second"]);
    }
}
