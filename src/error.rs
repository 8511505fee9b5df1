//! Error types for xsdclass
//!
//! Every failure in this crate is fatal for the schema being processed:
//! nothing is retried and nothing is substituted with a default.

use std::fmt;
use thiserror::Error;

use crate::model::ComponentKind;

/// Result type alias using xsdclass Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsdclass operations
#[derive(Error, Debug)]
pub enum Error {
    /// A group, type or element name does not exist in the schema
    #[error("lookup error: unable to find {kind} with name '{name}'")]
    Lookup {
        /// Namespace the name was looked up in
        kind: ComponentKind,
        /// The missing name
        name: String,
    },

    /// A cross-reference is not present in the resolution cache
    #[error("resolution error: {entity} references '{reference}' which has not been resolved")]
    Unresolved {
        /// Entity whose specification was being built
        entity: String,
        /// The reference that could not be resolved
        reference: String,
    },

    /// The builder met a schema shape it has no rule for
    #[error("build contract violation in {entity}: {reason}")]
    BuildContract {
        /// Entity whose specification was being built
        entity: String,
        /// What was encountered
        reason: String,
    },

    /// An identifier could not be derived
    #[error("name derivation failure in {entity}: {reason}")]
    NameDerivation {
        /// Entity whose specification was being built
        entity: String,
        /// Why no identifier could be derived
        reason: String,
    },

    /// XML Schema parsing/building error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Namespace error
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),
}

impl Error {
    /// Create a lookup error
    pub fn lookup(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self::Lookup {
            kind,
            name: name.into(),
        }
    }

    /// Create a resolution error
    pub fn unresolved(entity: impl Into<String>, reference: impl Into<String>) -> Self {
        Self::Unresolved {
            entity: entity.into(),
            reference: reference.into(),
        }
    }

    /// Create a build contract violation
    pub fn build_contract(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BuildContract {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    /// Create a name derivation failure
    pub fn name_derivation(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NameDerivation {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

/// XML Schema parsing error
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the schema file
    pub location: Option<String>,
    /// Schema source that caused the error
    pub source: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            source: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        if let Some(ref src) = self.source {
            write!(f, "\n\nSource:\n{}", src)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_names_missing_entity() {
        let err = Error::lookup(ComponentKind::Type, "compounddefType");
        let msg = err.to_string();
        assert!(msg.contains("type"));
        assert!(msg.contains("'compounddefType'"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Invalid schema syntax")
            .with_location("compound.xsd")
            .with_source("<xs:element name='invalid'/>");

        let msg = format!("{}", err);
        assert!(msg.contains("Invalid schema syntax"));
        assert!(msg.contains("Location:"));
        assert!(msg.contains("Source:"));
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ParseError::new("test").into();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_build_contract_display() {
        let err = Error::build_contract("Sectiondef", "xs:any wildcard");
        assert_eq!(
            err.to_string(),
            "build contract violation in Sectiondef: xs:any wildcard"
        );
    }
}
