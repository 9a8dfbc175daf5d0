//! Integration tests for schema tree loading and lowering

use pretty_assertions::assert_eq;
use pve_openapi_generator_common::{FieldKey, GeneratorError, Primitive, ShapeKind, TypeShape};
use pve_openapi_generator_parser::{parse_source_file, SourceParser, SourceTree};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_load_yaml_tree() {
    let nodes = parse_source_file(fixture("apidata.yaml")).expect("fixture should parse");

    assert_eq!(nodes.len(), 1);
    let access = &nodes[0];
    assert_eq!(access.path, "/access");
    assert!(access.methods.contains_key("GET"));

    let users = &access.children[0];
    assert_eq!(users.path, "/access/users");
    let methods: Vec<&str> = users.methods.keys().map(String::as_str).collect();
    assert_eq!(methods, ["GET", "POST"]);

    let user = &users.children[0];
    assert_eq!(user.path, "/access/users/{userid}");
    assert!(user.children.is_empty());
}

#[test]
fn test_optional_flag_only_accepts_one() {
    let nodes = parse_source_file(fixture("apidata.yaml")).unwrap();
    let params = &nodes[0].children[0].methods["GET"].parameters;

    let flags: Vec<(String, bool)> = params
        .iter()
        .map(|p| (p.key.source_name(), p.optional))
        .collect();
    assert_eq!(
        flags,
        [("enabled".to_string(), true), ("full".to_string(), false)]
    );
}

#[test]
fn test_flat_parameter_map_and_repeated_keys() {
    let nodes = parse_source_file(fixture("apidata.yaml")).unwrap();
    let post = &nodes[0].children[0].methods["POST"];

    assert_eq!(post.parameters.len(), 2);
    assert_eq!(post.parameters[0].key, FieldKey::Named("userid".to_string()));
    assert_eq!(
        post.parameters[1].key,
        FieldKey::RepeatedSibling {
            base: "groups".to_string()
        }
    );
    assert_eq!(post.parameters[1].shape, TypeShape::primitive(Primitive::String));
    assert_eq!(post.returns.kind, ShapeKind::Null);
}

#[test]
fn test_inference_gaps_are_kept_open() {
    let nodes = parse_source_file(fixture("apidata.yaml")).unwrap();
    let returns = &nodes[0].children[0].methods["GET"].returns;

    let ShapeKind::Array(Some(items)) = &returns.kind else {
        panic!("expected array with items, got {:?}", returns.kind);
    };
    let ShapeKind::Object(Some(properties)) = &items.kind else {
        panic!("expected object with properties");
    };
    assert_eq!(properties[1].key.source_name(), "tokens");
    assert_eq!(properties[1].shape.kind, ShapeKind::Array(None));
}

#[test]
fn test_missing_path_aborts_the_run() {
    let err = parse_source_file(fixture("missing_path.json")).unwrap_err();

    match err {
        GeneratorError::Structural { location, message } => {
            assert_eq!(location, "root[0].children[0] ('{poolid}')");
            assert!(message.contains("no path"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_untyped_parameter_aborts_the_run() {
    let err = parse_source_file(fixture("untyped_parameter.json")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid source at POST /storage: parameter 'content' has no type"
    );
}

#[test]
fn test_missing_file_is_parse_error() {
    let result = SourceParser::from_file(fixture("does_not_exist.json"));
    assert!(matches!(result, Err(GeneratorError::Parse(_))));
}

#[test]
fn test_single_root_object() {
    let parser = SourceParser::from_json(
        r#"{"path": "/version", "info": {"GET": {"returns": {"type": "object"}}}}"#,
    )
    .unwrap();

    assert!(matches!(parser.tree(), SourceTree::Single(_)));
    let nodes = parser.parse().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].methods["GET"].returns.kind, ShapeKind::Object(None));
}

#[test]
fn test_malformed_parameter_fails_instead_of_dropping_the_block() {
    let result = SourceParser::from_json(
        r#"[{
            "path": "/nodes/{node}/qemu",
            "info": {
                "POST": {
                    "parameters": {
                        "additionalProperties": 0,
                        "properties": {
                            "node": { "type": "string" },
                            "vmid": { "type": "integer" },
                            "memory": { "type": "integer", "description": 512 }
                        }
                    }
                }
            }
        }]"#,
    );

    assert!(matches!(result, Err(GeneratorError::Parse(_))));
}

#[test]
fn test_wrapped_parameters_survive_lowering() {
    let nodes = SourceParser::from_json(
        r#"[{
            "path": "/nodes/{node}/qemu",
            "info": {
                "POST": {
                    "parameters": {
                        "additionalProperties": 0,
                        "properties": {
                            "node": { "type": "string" },
                            "vmid": { "type": "integer" },
                            "memory": { "type": "integer", "optional": 1 }
                        }
                    }
                }
            }
        }]"#,
    )
    .unwrap()
    .parse()
    .unwrap();

    let names: Vec<String> = nodes[0].methods["POST"]
        .parameters
        .iter()
        .map(|p| p.key.source_name())
        .collect();
    assert_eq!(names, ["node", "vmid", "memory"]);
}
