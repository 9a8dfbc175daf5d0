//! Accumulator for everything discovered during one build

use indexmap::IndexMap;
use pve_openapi_generator_common::{
    Components, GeneratorConfig, OpenApiDocument, Operation, PathItem, Response, Schema,
    Tag, OPENAPI_VERSION,
};
use std::collections::HashSet;
use tracing::warn;

/// Path items, named schemas, named responses and tags of a single build
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    paths: IndexMap<String, PathItem>,
    schemas: IndexMap<String, Schema>,
    responses: IndexMap<String, Response>,
    tags: Vec<String>,
    operation_ids: HashSet<String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a path item exists for `route`
    pub fn register_path(&mut self, route: &str) {
        self.paths.entry(route.to_string()).or_default();
    }

    pub fn insert_operation(&mut self, route: &str, method: &str, operation: Operation) {
        if !self.operation_ids.insert(operation.operation_id.clone()) {
            warn!(
                operation_id = %operation.operation_id,
                route,
                method,
                "duplicate operation id"
            );
        }

        self.paths
            .entry(route.to_string())
            .or_default()
            .insert(method.to_string(), operation);
    }

    /// Later registrations under the same name replace earlier ones in place
    pub fn register_schema(&mut self, name: String, schema: Schema) {
        if self.schemas.contains_key(&name) {
            warn!(schema = %name, "replacing request schema of duplicate operation id");
        }
        self.schemas.insert(name, schema);
    }

    pub fn register_response(&mut self, name: String, response: Response) {
        if self.responses.contains_key(&name) {
            warn!(response = %name, "replacing response of duplicate operation id");
        }
        self.responses.insert(name, response);
    }

    /// Append `tag` unless it has been seen before
    pub fn register_tag(&mut self, tag: &str) {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    pub fn operation_count(&self) -> usize {
        self.paths.values().map(|item| item.len()).sum()
    }

    /// Consume the registry and produce the document envelope
    pub fn assemble(self, config: &GeneratorConfig) -> OpenApiDocument {
        OpenApiDocument {
            openapi: OPENAPI_VERSION.to_string(),
            info: config.metadata.clone(),
            servers: vec![config.server.clone()],
            tags: self
                .tags
                .into_iter()
                .map(|name| Tag { name })
                .collect(),
            paths: self.paths,
            components: Components {
                schemas: self.schemas,
                responses: self.responses,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pve_openapi_generator_common::{
        MediaType, Reference, SchemaOrRef, SchemaType, JSON_MEDIA_TYPE,
    };

    fn operation(id: &str) -> Operation {
        Operation {
            operation_id: id.to_string(),
            summary: id.to_string(),
            description: id.to_string(),
            tags: vec!["nodes".to_string()],
            parameters: vec![],
            request_body: None,
            responses: [("200".to_string(), Reference::response("X"))]
                .into_iter()
                .collect(),
        }
    }

    fn response(schema_type: SchemaType) -> Response {
        Response {
            description: String::new(),
            content: [(
                JSON_MEDIA_TYPE.to_string(),
                MediaType {
                    schema: SchemaOrRef::Schema(Box::new(Schema::new(schema_type))),
                },
            )]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_tags_are_deduplicated_in_first_seen_order() {
        let mut registry = SchemaRegistry::new();
        registry.register_tag("nodes");
        registry.register_tag("cluster");
        registry.register_tag("nodes");
        registry.register_tag("access");

        let document = registry.assemble(&GeneratorConfig::default());
        let names: Vec<&str> = document.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["nodes", "cluster", "access"]);
    }

    #[test]
    fn test_registered_path_starts_empty_and_fills_in_place() {
        let mut registry = SchemaRegistry::new();
        registry.register_path("/nodes");
        registry.register_path("/cluster");
        registry.insert_operation("/nodes", "get", operation("getNodes"));

        assert_eq!(registry.operation_count(), 1);

        let document = registry.assemble(&GeneratorConfig::default());
        let routes: Vec<&String> = document.paths.keys().collect();
        assert_eq!(routes, ["/nodes", "/cluster"]);
        assert!(document.paths["/cluster"].is_empty());
        assert!(document.operation("/nodes", "get").is_some());
    }

    #[test]
    fn test_registering_a_path_twice_keeps_operations() {
        let mut registry = SchemaRegistry::new();
        registry.register_path("/nodes");
        registry.insert_operation("/nodes", "get", operation("getNodes"));
        registry.register_path("/nodes");

        assert_eq!(registry.operation_count(), 1);
    }

    #[test]
    fn test_duplicate_operation_id_keeps_both_operations_and_last_components() {
        let mut registry = SchemaRegistry::new();
        registry.register_schema("CreateVmRequest".to_string(), Schema::new(SchemaType::Object));
        registry.register_schema("OtherRequest".to_string(), Schema::new(SchemaType::Object));
        registry.register_response("CreateVmResponse".to_string(), response(SchemaType::Object));
        registry.insert_operation("/nodes/{node}/qemu", "post", operation("createVm"));

        registry.register_schema("CreateVmRequest".to_string(), Schema::new(SchemaType::String));
        registry.register_response("CreateVmResponse".to_string(), response(SchemaType::String));
        registry.insert_operation("/nodes/{node}/lxc", "post", operation("createVm"));

        assert_eq!(registry.operation_count(), 2);

        let document = registry.assemble(&GeneratorConfig::default());
        let schemas: Vec<&String> = document.components.schemas.keys().collect();
        assert_eq!(schemas, ["CreateVmRequest", "OtherRequest"]);
        assert_eq!(
            document.components.schemas["CreateVmRequest"].schema_type,
            SchemaType::String
        );
        assert_eq!(
            document.components.responses["CreateVmResponse"].content[JSON_MEDIA_TYPE].schema,
            SchemaOrRef::Schema(Box::new(Schema::new(SchemaType::String)))
        );
        assert!(document.operation("/nodes/{node}/qemu", "post").is_some());
        assert!(document.operation("/nodes/{node}/lxc", "post").is_some());
    }

    #[test]
    fn test_assemble_envelope() {
        let mut registry = SchemaRegistry::new();
        registry.register_schema(
            "CreateNodesRequest".to_string(),
            Schema::new(SchemaType::Object),
        );

        let config = GeneratorConfig::default();
        let document = registry.assemble(&config);

        assert_eq!(document.openapi, "3.0.0");
        assert_eq!(document.info, config.metadata);
        assert_eq!(document.servers, vec![config.server.clone()]);
        assert!(document.components.schemas.contains_key("CreateNodesRequest"));
        assert!(document.components.responses.is_empty());
    }
}
