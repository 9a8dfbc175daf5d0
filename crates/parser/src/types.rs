//! Proxmox VE API schema tree type definitions
//!
//! Mirrors the `apidata` export: a forest of nodes, each with an optional
//! `info` block of per-method descriptors and nested `children`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema tree root: either a list of top-level nodes or a single node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceTree {
    Nodes(Vec<SourceNode>),
    Single(Box<SourceNode>),
}

impl SourceTree {
    /// Top-level nodes in declared order
    pub fn roots(&self) -> &[SourceNode] {
        match self {
            SourceTree::Nodes(nodes) => nodes,
            SourceTree::Single(node) => std::slice::from_ref(node.as_ref()),
        }
    }
}

/// One route level of the tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceNode {
    /// Fully resolved route (e.g. "/nodes/{node}/qemu")
    #[serde(default)]
    pub path: Option<String>,

    /// Last path segment, used only in diagnostics
    #[serde(default)]
    pub text: Option<String>,

    /// Method descriptors keyed by HTTP method (`GET`, `POST`, ...)
    #[serde(alias = "info")]
    #[serde(default)]
    pub methods: IndexMap<String, MethodDescriptor>,

    /// Nested routes
    #[serde(default)]
    pub children: Vec<SourceNode>,
}

/// Method (API operation) descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDescriptor {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub parameters: Option<ParameterBlock>,

    /// Response payload
    #[serde(default)]
    pub returns: Option<TypeDescriptor>,
}

/// Method parameters in either of the shapes found in exports
///
/// Most nodes wrap them as `{ "additionalProperties": 0, "properties": { ... } }`;
/// older exports use a bare name -> descriptor map. A malformed descriptor in
/// either shape fails deserialization of the whole tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterBlock {
    #[serde(rename = "additionalProperties")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, ParameterDescriptor>>,

    /// Bare descriptors next to (or instead of) `properties`
    #[serde(flatten)]
    pub flat: IndexMap<String, ParameterDescriptor>,
}

impl ParameterBlock {
    /// Parameters in declared order
    pub fn entries(&self) -> impl Iterator<Item = (&String, &ParameterDescriptor)> {
        self.properties.iter().flatten().chain(self.flat.iter())
    }
}

/// Parameter definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    #[serde(flatten)]
    pub schema: TypeDescriptor,

    /// Tri-state flag: only the number `1` marks the parameter optional
    #[serde(default)]
    pub optional: Option<Value>,
}

/// Type descriptor shared by parameters and return payloads
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type (string, number, integer, boolean, array, object, null)
    #[serde(rename = "type")]
    #[serde(default)]
    pub type_name: Option<String>,

    /// Element type (for array type)
    #[serde(default)]
    pub items: Option<Box<TypeDescriptor>>,

    /// Members (for object type)
    #[serde(default)]
    pub properties: Option<IndexMap<String, TypeDescriptor>>,

    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_alias_and_extra_fields() {
        let node: SourceNode = serde_json::from_str(
            r#"{
                "path": "/version",
                "text": "version",
                "leaf": 1,
                "info": {
                    "GET": {
                        "description": "API version details.",
                        "returns": { "type": "object" }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(node.path.as_deref(), Some("/version"));
        assert_eq!(node.methods.len(), 1);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_parameter_block_shapes() {
        let wrapped: ParameterBlock = serde_json::from_str(
            r#"{"additionalProperties": 0, "properties": {"node": {"type": "string"}}}"#,
        )
        .unwrap();
        assert_eq!(wrapped.entries().count(), 1);

        let flat: ParameterBlock =
            serde_json::from_str(r#"{"node": {"type": "string"}, "vmid": {"type": "integer"}}"#)
                .unwrap();
        let names: Vec<&String> = flat.entries().map(|(name, _)| name).collect();
        assert_eq!(names, ["node", "vmid"]);

        let empty: ParameterBlock =
            serde_json::from_str(r#"{"additionalProperties": 0}"#).unwrap();
        assert_eq!(empty.entries().count(), 0);
    }

    #[test]
    fn test_malformed_parameter_rejects_the_block() {
        let wrapped = serde_json::from_str::<ParameterBlock>(
            r#"{"additionalProperties": 0, "properties": {
                "node": {"type": "string"},
                "memory": {"type": "integer", "description": 512}
            }}"#,
        );
        assert!(wrapped.is_err());

        let flat = serde_json::from_str::<ParameterBlock>(
            r#"{"node": {"type": "string"}, "vmid": {"type": ["integer"]}}"#,
        );
        assert!(flat.is_err());
    }

    #[test]
    fn test_wrapped_parameters_keep_declared_order() {
        let block: ParameterBlock = serde_json::from_str(
            r#"{"additionalProperties": 0, "properties": {
                "vmid": {"type": "integer"},
                "node": {"type": "string"},
                "cores": {"type": "integer", "optional": 1}
            }}"#,
        )
        .unwrap();
        let names: Vec<&String> = block.entries().map(|(name, _)| name).collect();
        assert_eq!(names, ["vmid", "node", "cores"]);
    }

    #[test]
    fn test_optional_flag_is_kept_raw() {
        let param: ParameterDescriptor =
            serde_json::from_str(r#"{"type": "boolean", "optional": 1, "default": 0}"#).unwrap();
        assert_eq!(param.schema.type_name.as_deref(), Some("boolean"));
        assert_eq!(param.optional, Some(Value::from(1)));
    }

    #[test]
    fn test_single_root() {
        let tree: SourceTree = serde_json::from_str(r#"{"path": "/cluster"}"#).unwrap();
        assert_eq!(tree.roots().len(), 1);
    }
}
