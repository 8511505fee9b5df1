//! XSD built-in types
//!
//! Every built-in datatype of XSD 1.0 is mapped onto the value kind a
//! generated accessor returns. Derived built-ins collapse onto their
//! primitive family (`xs:int`, `xs:positiveInteger` and `xs:long` are all
//! integers).

use std::fmt;

/// Local name of the ur-type
pub const ANY_TYPE: &str = "anyType";

/// Local name of the simple ur-type
pub const ANY_SIMPLE_TYPE: &str = "anySimpleType";

/// Value family of a simple type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Character data, including tokens, names and identifiers
    String,
    /// Integral numbers of any width
    Integer,
    /// Arbitrary precision decimals
    Decimal,
    /// Floating point numbers
    Float,
    /// `true`/`false`/`1`/`0`
    Boolean,
    /// `xs:duration`
    Duration,
    /// `xs:dateTime`
    DateTime,
    /// `xs:date` and the Gregorian fragments
    Date,
    /// `xs:time`
    Time,
    /// `xs:hexBinary` and `xs:base64Binary`
    Binary,
    /// `xs:anyURI`
    AnyUri,
    /// `xs:QName` and `xs:NOTATION`
    QName,
    /// Whitespace separated list of items
    List,
    /// `xs:anySimpleType`
    AnySimple,
}

impl ValueKind {
    /// Stable name used in derived specifications
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Duration => "duration",
            Self::DateTime => "dateTime",
            Self::Date => "date",
            Self::Time => "time",
            Self::Binary => "binary",
            Self::AnyUri => "anyURI",
            Self::QName => "QName",
            Self::List => "list",
            Self::AnySimple => "anySimpleType",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an XSD built-in simple type local name to its value kind
pub fn builtin_kind(local_name: &str) -> Option<ValueKind> {
    let kind = match local_name {
        "string" | "normalizedString" | "token" | "language" | "Name" | "NCName" | "ID"
        | "IDREF" | "ENTITY" | "NMTOKEN" => ValueKind::String,
        "IDREFS" | "ENTITIES" | "NMTOKENS" => ValueKind::List,
        "boolean" => ValueKind::Boolean,
        "decimal" => ValueKind::Decimal,
        "integer" | "long" | "int" | "short" | "byte" | "nonNegativeInteger"
        | "positiveInteger" | "unsignedLong" | "unsignedInt" | "unsignedShort"
        | "unsignedByte" | "nonPositiveInteger" | "negativeInteger" => ValueKind::Integer,
        "float" | "double" => ValueKind::Float,
        "duration" => ValueKind::Duration,
        "dateTime" => ValueKind::DateTime,
        "date" | "gYearMonth" | "gYear" | "gMonthDay" | "gDay" | "gMonth" => ValueKind::Date,
        "time" => ValueKind::Time,
        "hexBinary" | "base64Binary" => ValueKind::Binary,
        "anyURI" => ValueKind::AnyUri,
        "QName" | "NOTATION" => ValueKind::QName,
        ANY_SIMPLE_TYPE => ValueKind::AnySimple,
        _ => return None,
    };
    Some(kind)
}

/// Whether the local name is an XSD built-in (simple or the ur-type)
pub fn is_builtin(local_name: &str) -> bool {
    local_name == ANY_TYPE || builtin_kind(local_name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_builtins_collapse_to_primitive_family() {
        assert_eq!(builtin_kind("int"), Some(ValueKind::Integer));
        assert_eq!(builtin_kind("unsignedByte"), Some(ValueKind::Integer));
        assert_eq!(builtin_kind("NMTOKEN"), Some(ValueKind::String));
        assert_eq!(builtin_kind("double"), Some(ValueKind::Float));
        assert_eq!(builtin_kind("boolean"), Some(ValueKind::Boolean));
    }

    #[test]
    fn test_unknown_builtin() {
        assert_eq!(builtin_kind("DoxBool"), None);
        assert!(is_builtin(ANY_TYPE));
        assert!(!is_builtin("compounddefType"));
    }
}
