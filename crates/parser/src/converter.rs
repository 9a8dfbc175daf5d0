//! Converts the raw schema tree to the normalized `ApiNode` tree
//!
//! Structural problems (a node with methods but no path, a parameter without
//! a type) abort the conversion. Shapes the rules cannot classify degrade to
//! opaque fragments and are only reported at debug level.

use super::type_mapper::{SourceKind, TypeMapper};
use super::types::{MethodDescriptor, SourceNode, SourceTree, TypeDescriptor};
use pve_openapi_generator_common::{
    ApiNode, FieldKey, GeneratorError, MethodDefinition, ParameterDefinition, Primitive,
    PropertyDefinition, Result, ShapeKind, TypeShape,
};
use tracing::debug;

/// Convert a schema tree into normalized nodes
pub fn convert_source_tree(tree: &SourceTree) -> Result<Vec<ApiNode>> {
    tree.roots()
        .iter()
        .enumerate()
        .map(|(i, node)| convert_node(node, &format!("root[{}]", i)))
        .collect()
}

/// Recursively convert one node and its children
fn convert_node(node: &SourceNode, location: &str) -> Result<ApiNode> {
    let path = match (&node.path, node.methods.is_empty()) {
        (Some(path), _) => path.clone(),
        (None, true) => String::new(),
        (None, false) => {
            return Err(GeneratorError::Structural {
                location: describe_node(node, location),
                message: format!(
                    "node declares methods ({}) but has no path",
                    node.methods.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
            });
        }
    };

    let mut methods = indexmap::IndexMap::with_capacity(node.methods.len());
    for (method_name, descriptor) in &node.methods {
        let definition = convert_method(&path, method_name, descriptor)?;
        methods.insert(method_name.clone(), definition);
    }

    let children = node
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| convert_node(child, &format!("{}.children[{}]", location, i)))
        .collect::<Result<Vec<_>>>()?;

    Ok(ApiNode {
        path,
        methods,
        children,
    })
}

fn describe_node(node: &SourceNode, location: &str) -> String {
    match &node.text {
        Some(text) => format!("{} ('{}')", location, text),
        None => location.to_string(),
    }
}

/// Convert a method descriptor
fn convert_method(
    path: &str,
    method_name: &str,
    descriptor: &MethodDescriptor,
) -> Result<MethodDefinition> {
    let mut parameters = Vec::new();

    if let Some(ref block) = descriptor.parameters {
        for (param_name, param) in block.entries() {
            if param.schema.type_name.is_none() {
                return Err(GeneratorError::Structural {
                    location: format!("{} {}", method_name.to_uppercase(), path),
                    message: format!("parameter '{}' has no type", param_name),
                });
            }

            parameters.push(ParameterDefinition {
                key: FieldKey::parse(param_name),
                shape: convert_type(&param.schema),
                optional: TypeMapper::is_optional(param.optional.as_ref()),
            });
        }
    }

    // A missing `returns` block is an opaque payload
    let returns = descriptor
        .returns
        .as_ref()
        .map(convert_type)
        .unwrap_or_else(|| TypeShape::primitive(Primitive::String));

    Ok(MethodDefinition {
        description: descriptor.description.clone(),
        parameters,
        returns,
    })
}

/// Convert a type descriptor; total over every input shape
pub fn convert_type(descriptor: &TypeDescriptor) -> TypeShape {
    let kind = match descriptor.type_name.as_deref().map(TypeMapper::map_type) {
        Some(Some(SourceKind::Primitive(primitive))) => ShapeKind::Primitive(primitive),
        Some(Some(SourceKind::Null)) => ShapeKind::Null,
        Some(Some(SourceKind::Array)) => {
            if descriptor.items.is_none() {
                debug!("array descriptor without items, leaving element type open");
            }
            ShapeKind::Array(
                descriptor
                    .items
                    .as_ref()
                    .map(|items| Box::new(convert_type(items))),
            )
        }
        Some(Some(SourceKind::Object)) => {
            ShapeKind::Object(descriptor.properties.as_ref().map(|properties| {
                properties
                    .iter()
                    .map(|(name, property)| PropertyDefinition {
                        key: FieldKey::parse(name),
                        shape: convert_type(property),
                    })
                    .collect()
            }))
        }
        Some(None) => {
            debug!(
                type_name = descriptor.type_name.as_deref().unwrap_or_default(),
                "unknown type, treating as string"
            );
            ShapeKind::Primitive(Primitive::String)
        }
        None => ShapeKind::Primitive(Primitive::String),
    };

    TypeShape {
        kind,
        description: descriptor.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(json: &str) -> TypeDescriptor {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_convert_nested_type() {
        let shape = convert_type(&descriptor(
            r#"{
                "type": "array",
                "description": "VM list",
                "items": {
                    "type": "object",
                    "properties": {
                        "vmid": { "type": "integer" },
                        "net[n]": { "type": "string" }
                    }
                }
            }"#,
        ));

        assert_eq!(shape.description.as_deref(), Some("VM list"));
        let ShapeKind::Array(Some(items)) = shape.kind else {
            panic!("expected array with items, got {:?}", shape.kind);
        };
        let ShapeKind::Object(Some(properties)) = items.kind else {
            panic!("expected object with properties");
        };
        assert_eq!(properties[0].key, FieldKey::Named("vmid".to_string()));
        assert_eq!(
            properties[1].key,
            FieldKey::RepeatedSibling {
                base: "net".to_string()
            }
        );
    }

    #[test]
    fn test_gaps_degrade() {
        assert_eq!(
            convert_type(&descriptor(r#"{"type": "array"}"#)).kind,
            ShapeKind::Array(None)
        );
        assert_eq!(
            convert_type(&descriptor(r#"{"type": "object"}"#)).kind,
            ShapeKind::Object(None)
        );
        assert_eq!(
            convert_type(&descriptor(r#"{"type": "any"}"#)).kind,
            ShapeKind::Primitive(Primitive::String)
        );
        assert_eq!(
            convert_type(&descriptor(r#"{}"#)).kind,
            ShapeKind::Primitive(Primitive::String)
        );
        assert_eq!(
            convert_type(&descriptor(r#"{"type": "null"}"#)).kind,
            ShapeKind::Null
        );
    }

    #[test]
    fn test_missing_path_is_structural_error() {
        let tree: SourceTree = serde_json::from_str(
            r#"[{"path": "/cluster", "children": [
                {"text": "status", "info": {"GET": {"returns": {"type": "null"}}}}
            ]}]"#,
        )
        .unwrap();

        let err = convert_source_tree(&tree).unwrap_err();
        match err {
            GeneratorError::Structural { location, message } => {
                assert_eq!(location, "root[0].children[0] ('status')");
                assert!(message.contains("GET"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_untyped_parameter_is_structural_error() {
        let tree: SourceTree = serde_json::from_str(
            r#"[{"path": "/nodes/{node}", "info": {"GET": {
                "parameters": {"properties": {"node": {"description": "node name"}}}
            }}}]"#,
        )
        .unwrap();

        let err = convert_source_tree(&tree).unwrap_err();
        assert!(err.to_string().contains("parameter 'node' has no type"));
        assert!(err.to_string().contains("GET /nodes/{node}"));
    }

    #[test]
    fn test_grouping_node_without_path() {
        let tree: SourceTree =
            serde_json::from_str(r#"[{"children": [{"path": "/version", "info": {"GET": {}}}]}]"#)
                .unwrap();

        let nodes = convert_source_tree(&tree).unwrap();
        assert_eq!(nodes[0].path, "");
        assert_eq!(nodes[0].children[0].path, "/version");
        assert_eq!(
            nodes[0].children[0].methods["GET"].returns,
            TypeShape::primitive(Primitive::String)
        );
    }

    #[test]
    fn test_parameters_keep_order_and_optional_flag() {
        let tree: SourceTree = serde_json::from_str(
            r#"[{"path": "/nodes/{node}/qemu", "info": {"POST": {
                "parameters": {"additionalProperties": 0, "properties": {
                    "node": {"type": "string"},
                    "vmid": {"type": "integer"},
                    "net[n]": {"type": "string", "optional": 1}
                }}
            }}}]"#,
        )
        .unwrap();

        let nodes = convert_source_tree(&tree).unwrap();
        let params = &nodes[0].methods["POST"].parameters;
        let names: Vec<String> = params.iter().map(|p| p.key.source_name()).collect();
        assert_eq!(names, ["node", "vmid", "net[n]"]);
        assert!(!params[0].optional);
        assert!(params[2].optional);
    }
}
