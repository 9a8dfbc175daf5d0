//! Builds one OpenAPI operation from a (route, method, definition) triple

use crate::operation_id::{
    capitalize_first, is_placeholder, resolve_operation_id, OperationIdOverrides,
};
use crate::registry::SchemaRegistry;
use crate::schema::{request_schema, response_schema};
use crate::strategy::ResponseStrategy;
use indexmap::IndexMap;
use pve_openapi_generator_common::{
    FieldKey, MediaType, MethodDefinition, Operation, Parameter, ParameterDefinition,
    ParameterLocation, Primitive, Reference, RequestBody, Response, Schema, SchemaOrRef,
    SchemaType, ShapeKind, TypeShape, JSON_MEDIA_TYPE,
};
use tracing::debug;

/// Tag used for routes without any segment
const ROOT_TAG: &str = "root";

/// A parameter after the indexed-array rewrite
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedParameter {
    pub name: String,
    pub shape: TypeShape,
    pub optional: bool,
}

/// Rewrite `name[n]` string parameters into `name` arrays of the original descriptor
pub(crate) fn resolve_parameter(param: &ParameterDefinition) -> ResolvedParameter {
    match &param.key {
        FieldKey::RepeatedSibling { base } if param.shape.is_string() => ResolvedParameter {
            name: base.clone(),
            shape: TypeShape::new(ShapeKind::Array(Some(Box::new(param.shape.clone())))),
            optional: param.optional,
        },
        key => ResolvedParameter {
            name: key.source_name(),
            shape: param.shape.clone(),
            optional: param.optional,
        },
    }
}

/// Whether `name` appears as `{name}` in the route
fn is_path_parameter(route: &str, name: &str) -> bool {
    route.contains(&format!("{{{}}}", name))
}

/// Names of the `{placeholder}` segments of a route, in order
pub(crate) fn route_placeholders(route: &str) -> impl Iterator<Item = &str> {
    route
        .split('/')
        .filter(|segment| is_placeholder(segment))
        .map(|segment| &segment[1..segment.len() - 1])
}

/// First non-empty route segment, used verbatim as the tag
pub(crate) fn route_tag(route: &str) -> &str {
    route
        .split('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(ROOT_TAG)
}

/// Methods that carry a request body
fn has_request_body(method: &str) -> bool {
    matches!(method, "post" | "put")
}

/// Turns method definitions into operations and registers their schemas
pub(crate) struct OperationBuilder<'a> {
    overrides: &'a dyn OperationIdOverrides,
    strategy: &'a dyn ResponseStrategy,
    include_query_params: bool,
}

impl<'a> OperationBuilder<'a> {
    pub fn new(
        overrides: &'a dyn OperationIdOverrides,
        strategy: &'a dyn ResponseStrategy,
        include_query_params: bool,
    ) -> Self {
        Self {
            overrides,
            strategy,
            include_query_params,
        }
    }

    /// Build the operation for a lower-case `method` and register everything it produces
    pub fn build(
        &self,
        route: &str,
        method: &str,
        definition: &MethodDefinition,
        registry: &mut SchemaRegistry,
    ) {
        let operation_id = resolve_operation_id(method, route, self.overrides);
        let capitalized = capitalize_first(&operation_id);
        let request_name = format!("{}Request", capitalized);
        let response_name = format!("{}Response", capitalized);

        debug!(route, method, operation_id = %operation_id, "building operation");

        let (path_params, residual): (Vec<_>, Vec<_>) = definition
            .parameters
            .iter()
            .map(resolve_parameter)
            .partition(|p| is_path_parameter(route, &p.name));

        let mut parameters: Vec<Parameter> = path_params
            .iter()
            .map(|p| path_parameter(&p.name, &p.shape))
            .collect();

        // Placeholders without a declared parameter still need one
        for placeholder in route_placeholders(route) {
            if !path_params.iter().any(|p| p.name == placeholder) {
                debug!(route, placeholder, "synthesizing undeclared path parameter");
                let shape = TypeShape::primitive(Primitive::String);
                parameters.push(path_parameter(placeholder, &shape));
            }
        }

        let mut request_body = None;
        if has_request_body(method) {
            let model = self.request_model(&request_name, &residual);
            registry.register_schema(request_name.clone(), model);
            request_body = Some(RequestBody {
                content: json_content(SchemaOrRef::Reference(Reference::schema(&request_name))),
            });
        } else if self.include_query_params {
            parameters.extend(residual.iter().map(|p| Parameter {
                name: p.name.clone(),
                location: ParameterLocation::Query,
                required: !p.optional,
                description: p.name.clone(),
                schema: request_schema(&p.shape),
            }));
        }

        let payload = response_schema(&definition.returns, self.strategy);
        registry.register_response(
            response_name.clone(),
            Response {
                description: response_name.clone(),
                content: json_content(SchemaOrRef::Schema(Box::new(
                    self.strategy.wrap(payload),
                ))),
            },
        );

        let tag = route_tag(route);
        let description = definition
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| operation_id.clone());

        let mut responses = IndexMap::with_capacity(1);
        responses.insert("200".to_string(), Reference::response(&response_name));

        registry.insert_operation(
            route,
            method,
            Operation {
                summary: operation_id.clone(),
                operation_id,
                description,
                tags: vec![tag.to_string()],
                parameters,
                request_body,
                responses,
            },
        );
        registry.register_tag(tag);
    }

    /// Object schema listing every body parameter
    fn request_model(&self, name: &str, params: &[ResolvedParameter]) -> Schema {
        let mut properties = IndexMap::with_capacity(params.len());
        let mut required = Vec::new();

        for param in params {
            properties.insert(param.name.clone(), request_schema(&param.shape));
            if !param.optional {
                required.push(param.name.clone());
            }
        }

        Schema {
            title: Some(name.to_string()),
            properties: Some(properties),
            required: (!required.is_empty()).then_some(required),
            ..Schema::new(SchemaType::Object)
        }
    }
}

fn path_parameter(name: &str, shape: &TypeShape) -> Parameter {
    Parameter {
        name: name.to_string(),
        location: ParameterLocation::Path,
        required: true,
        description: name.to_string(),
        schema: request_schema(shape),
    }
}

fn json_content(schema: SchemaOrRef) -> IndexMap<String, MediaType> {
    let mut content = IndexMap::with_capacity(1);
    content.insert(JSON_MEDIA_TYPE.to_string(), MediaType { schema });
    content
}
