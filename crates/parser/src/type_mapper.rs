//! Type mapping from source type names to the normalized shape vocabulary

use pve_openapi_generator_common::Primitive;
use serde_json::Value;

/// Classification of a source `type` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Primitive(Primitive),
    Null,
    Array,
    Object,
}

/// Maps source type names to [`SourceKind`]
pub struct TypeMapper;

impl TypeMapper {
    /// Map a source type name
    ///
    /// # Examples
    /// ```
    /// use pve_openapi_generator_parser::{SourceKind, TypeMapper};
    /// use pve_openapi_generator_common::Primitive;
    ///
    /// assert_eq!(TypeMapper::map_type("string"), Some(SourceKind::Primitive(Primitive::String)));
    /// assert_eq!(TypeMapper::map_type("array"), Some(SourceKind::Array));
    /// assert_eq!(TypeMapper::map_type("any"), None);
    /// ```
    pub fn map_type(type_name: &str) -> Option<SourceKind> {
        match type_name.trim().to_ascii_lowercase().as_str() {
            "string" => Some(SourceKind::Primitive(Primitive::String)),
            "number" => Some(SourceKind::Primitive(Primitive::Number)),
            "integer" => Some(SourceKind::Primitive(Primitive::Integer)),
            "boolean" => Some(SourceKind::Primitive(Primitive::Boolean)),
            "null" => Some(SourceKind::Null),
            "array" => Some(SourceKind::Array),
            "object" => Some(SourceKind::Object),
            _ => None,
        }
    }

    /// Check the tri-state `optional` flag: only the number `1` means optional
    pub fn is_optional(flag: Option<&Value>) -> bool {
        match flag {
            Some(Value::Number(n)) => n.as_f64() == Some(1.0),
            _ => false,
        }
    }
}
