//! Common types and utilities for the PVE OpenAPI Generator
//!
//! This crate contains the error type, the normalized API tree the parser
//! produces, the generator configuration and the OpenAPI document model
//! shared by the parser, generator, and CLI components.

mod config;
mod document;
mod overrides;

pub use config::{EnvelopeMode, GeneratorConfig, DEFAULT_INDEXED_ARRAY_BOUND};
pub use document::*;
pub use overrides::OverrideTable;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during document generation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    /// The source tree violates a structural precondition
    #[error("Invalid source at {location}: {message}")]
    Structural { location: String, message: String },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Suffix marking a family of numbered sibling fields (`net[n]` -> `net0`, `net1`, ...)
pub const INDEXED_SUFFIX: &str = "[n]";

/// One node of the normalized API tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiNode {
    /// Fully resolved route template (e.g. `/nodes/{node}/qemu`).
    /// Empty only for grouping nodes that declare no methods.
    pub path: String,

    /// Method descriptors keyed by the HTTP method name as declared in the source
    #[serde(default)]
    pub methods: IndexMap<String, MethodDefinition>,

    /// Child nodes in declared order
    #[serde(default)]
    pub children: Vec<ApiNode>,
}

impl ApiNode {
    /// Whether this node contributes a path item
    pub fn has_methods(&self) -> bool {
        !self.methods.is_empty()
    }
}

/// Metadata for one HTTP method of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub description: Option<String>,
    pub parameters: Vec<ParameterDefinition>,
    pub returns: TypeShape,
}

/// A named method parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub key: FieldKey,
    pub shape: TypeShape,
    /// True only when the source flag was exactly `1`
    pub optional: bool,
}

/// Property or parameter name, with the indexed-array convention made explicit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKey {
    /// An ordinary name
    Named(String),
    /// `base[n]`: numbered siblings `base0`, `base1`, ...
    RepeatedSibling { base: String },
}

impl FieldKey {
    /// Classify a source name by its suffix
    pub fn parse(name: &str) -> Self {
        match name.strip_suffix(INDEXED_SUFFIX) {
            Some(base) => FieldKey::RepeatedSibling {
                base: base.to_string(),
            },
            None => FieldKey::Named(name.to_string()),
        }
    }

    /// The name exactly as it appeared in the source
    pub fn source_name(&self) -> String {
        match self {
            FieldKey::Named(name) => name.clone(),
            FieldKey::RepeatedSibling { base } => format!("{}{}", base, INDEXED_SUFFIX),
        }
    }

    /// The name with any indexed suffix removed
    pub fn base_name(&self) -> &str {
        match self {
            FieldKey::Named(name) => name,
            FieldKey::RepeatedSibling { base } => base,
        }
    }
}

/// Scalar value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    String,
    Number,
    Integer,
    Boolean,
}

/// Normalized type descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeShape {
    pub kind: ShapeKind,
    pub description: Option<String>,
}

/// Structural kind of a [`TypeShape`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Primitive(Primitive),
    Null,
    /// `None` when the source declared an array without `items`
    Array(Option<Box<TypeShape>>),
    /// `None` when the source declared an object without `properties`
    Object(Option<Vec<PropertyDefinition>>),
}

/// A member of an object shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub key: FieldKey,
    pub shape: TypeShape,
}

impl TypeShape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }

    pub fn primitive(primitive: Primitive) -> Self {
        Self::new(ShapeKind::Primitive(primitive))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, ShapeKind::Primitive(Primitive::String))
    }

    /// OpenAPI type for this shape; `null` collapses to `string`
    pub fn schema_type(&self) -> SchemaType {
        match &self.kind {
            ShapeKind::Primitive(Primitive::String) | ShapeKind::Null => SchemaType::String,
            ShapeKind::Primitive(Primitive::Number) => SchemaType::Number,
            ShapeKind::Primitive(Primitive::Integer) => SchemaType::Integer,
            ShapeKind::Primitive(Primitive::Boolean) => SchemaType::Boolean,
            ShapeKind::Array(_) => SchemaType::Array,
            ShapeKind::Object(_) => SchemaType::Object,
        }
    }
}
