//! OpenAPI 3.0 document model
//!
//! Covers the subset the generator emits. Every map is an `IndexMap` so that
//! serialization follows insertion order and repeated runs are byte-identical.

use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// OpenAPI version written into every document
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Media type used for every request and response body
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// OpenAPI document root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version (e.g., "3.0.0")
    pub openapi: String,

    /// API metadata
    pub info: Info,

    /// Servers
    pub servers: Vec<Server>,

    /// Tags in first-seen order
    pub tags: Vec<Tag>,

    /// Path items keyed by route template
    pub paths: IndexMap<String, PathItem>,

    /// Reusable components
    pub components: Components,
}

/// API information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
    pub title: String,
    pub version: String,
    pub description: String,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

/// Server information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// Operations for one route, keyed by lower-case HTTP method
pub type PathItem = IndexMap<String, Operation>;

/// HTTP operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId")]
    pub operation_id: String,

    pub summary: String,

    pub description: String,

    pub tags: Vec<String>,

    pub parameters: Vec<Parameter>,

    #[serde(rename = "requestBody", default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    /// Always exactly one entry, `200`
    pub responses: IndexMap<String, Reference>,
}

/// Parameter definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    pub required: bool,

    pub description: String,

    pub schema: Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
}

/// Request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub content: IndexMap<String, MediaType>,
}

/// Named response component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: SchemaOrRef,
}

/// A `$ref` pointer into the components block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

impl Reference {
    pub fn schema(name: &str) -> Self {
        Self {
            ref_path: format!("#/components/schemas/{}", name),
        }
    }

    pub fn response(name: &str) -> Self {
        Self {
            ref_path: format!("#/components/responses/{}", name),
        }
    }
}

/// Schema or reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    /// Reference to a named component
    Reference(Reference),

    /// Inline schema
    Schema(Box<Schema>),
}

/// Schema types the generator can emit; `null` is not representable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

/// Schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,

    /// Never serialized as an empty list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl Schema {
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            title: None,
            schema_type,
            description: None,
            items: None,
            properties: None,
            required: None,
        }
    }

    /// `{type: array, items: {type: string}}`
    pub fn string_array() -> Self {
        Self {
            items: Some(Box::new(Schema::new(SchemaType::String))),
            ..Schema::new(SchemaType::Array)
        }
    }
}

/// Reusable components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Named request schemas
    pub schemas: IndexMap<String, Schema>,

    /// Named responses
    pub responses: IndexMap<String, Response>,
}

/// Summary counts for a generated document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub paths: usize,
    pub operations: usize,
    pub tags: usize,
    pub request_schemas: usize,
    pub responses: usize,
}

impl OpenApiDocument {
    /// Render as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up an operation by route and lower-case method
    pub fn operation(&self, route: &str, method: &str) -> Option<&Operation> {
        self.paths.get(route).and_then(|item| item.get(method))
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            paths: self.paths.len(),
            operations: self.paths.values().map(|item| item.len()).sum(),
            tags: self.tags.len(),
            request_schemas: self.components.schemas.len(),
            responses: self.components.responses.len(),
        }
    }
}
