//! Schema tree parsing for the Proxmox VE API
//!
//! This crate loads the PVE `apidata` schema tree and lowers it into the
//! normalized [`ApiNode`] representation consumed by the generator.
//!
//! ## Parsing Strategy
//!
//! The export is a forest of route nodes. Each node may carry an `info`
//! block with one descriptor per HTTP method and a list of `children`:
//! - `parameters.properties` lists the method parameters
//! - `returns` describes the response payload
//!
//! Lowering performs the structural checks (every node that declares methods
//! has a `path`, every parameter has a `type`) and turns names ending in
//! `[n]` into explicit repeated-sibling keys.
//!
//! ## Usage
//! ```rust,ignore
//! use pve_openapi_generator_parser::SourceParser;
//!
//! let parser = SourceParser::from_file("apidata.json")?;
//! let nodes = parser.parse()?;
//! ```

mod converter;
mod parser;
mod type_mapper;
mod types;

pub use converter::convert_type;
pub use parser::SourceParser;
pub use type_mapper::{SourceKind, TypeMapper};
pub use types::*;

use pve_openapi_generator_common::{ApiNode, Result};
use std::path::Path;

/// Load and lower a schema tree file
///
/// # Arguments
/// * `path` - JSON or YAML export of the schema tree
///
/// # Returns
/// * Normalized top-level nodes in declared order
pub fn parse_source_file<P: AsRef<Path>>(path: P) -> Result<Vec<ApiNode>> {
    SourceParser::from_file(path)?.parse()
}
