//! Schema tree file parser

use super::types::SourceTree;
use pve_openapi_generator_common::{ApiNode, GeneratorError, Result};
use std::fs;
use std::path::Path;

/// Proxmox VE API schema tree parser
///
/// Reads the `apidata` tree exported from a PVE installation, as JSON or
/// YAML, and lowers it into normalized [`ApiNode`]s.
pub struct SourceParser {
    /// Loaded schema tree
    tree: SourceTree,
}

impl SourceParser {
    /// Load a schema tree from file path
    ///
    /// `.yaml` and `.yml` files are read as YAML, everything else as JSON.
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = SourceParser::from_file("apidata.json")?;
    /// let nodes = parser.parse()?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read schema tree {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "yaml" | "yml"));

        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Parse a schema tree from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let tree: SourceTree = serde_json::from_str(json)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse schema JSON: {}", e)))?;

        Ok(Self { tree })
    }

    /// Parse a schema tree from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let tree: SourceTree = serde_yaml::from_str(yaml)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse schema YAML: {}", e)))?;

        Ok(Self { tree })
    }

    /// Validate and lower the tree into normalized nodes
    pub fn parse(&self) -> Result<Vec<ApiNode>> {
        super::converter::convert_source_tree(&self.tree)
    }

    /// Get reference to the underlying schema tree
    pub fn tree(&self) -> &SourceTree {
        &self.tree
    }
}
