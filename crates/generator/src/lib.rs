//! OpenAPI document generation for the PVE API
//!
//! This crate walks the [`ApiNode`] tree produced by the parser, derives an
//! operation for every (route, method) pair, infers request and response
//! schemas, and assembles a single OpenAPI 3.0 document.
//!
//! ```
//! use pve_openapi_generator_common::GeneratorConfig;
//! use pve_openapi_generator_generator::DocumentBuilder;
//!
//! let document = DocumentBuilder::new(GeneratorConfig::default()).build(&[]);
//! assert_eq!(document.openapi, "3.0.0");
//! assert!(document.paths.is_empty());
//! ```

mod operation;
mod operation_id;
mod registry;
mod schema;
mod strategy;
mod walker;
mod writer;

pub use operation_id::{
    capitalize_first, derive_operation_id, method_verb, resolve_operation_id,
    OperationIdOverrides,
};
pub use registry::SchemaRegistry;
pub use schema::{request_schema, response_schema};
pub use strategy::{strategy_for, EnvelopedResponse, FlatResponse, ResponseStrategy};
pub use writer::{DocumentWriter, OutputFormat};

use operation::OperationBuilder;
use pve_openapi_generator_common::{ApiNode, GeneratorConfig, OpenApiDocument, OverrideTable};
use tracing::info;

/// Builds an [`OpenApiDocument`] from a parsed API tree
///
/// A builder holds the configuration and the operation-id overrides; each
/// call to [`DocumentBuilder::build`] starts from an empty registry, so the
/// same builder can be reused.
pub struct DocumentBuilder {
    config: GeneratorConfig,
    overrides: Box<dyn OperationIdOverrides>,
}

impl DocumentBuilder {
    /// Create a builder with no overrides
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            overrides: Box::new(OverrideTable::new()),
        }
    }

    /// Replace the operation-id overrides
    pub fn with_overrides(mut self, overrides: impl OperationIdOverrides + 'static) -> Self {
        self.overrides = Box::new(overrides);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Walk `nodes` and assemble the document
    pub fn build(&self, nodes: &[ApiNode]) -> OpenApiDocument {
        let strategy = strategy_for(&self.config);
        let builder = OperationBuilder::new(
            self.overrides.as_ref(),
            strategy.as_ref(),
            self.config.include_query_params,
        );

        let mut registry = SchemaRegistry::new();
        walker::walk(nodes, &builder, &mut registry);

        let document = registry.assemble(&self.config);
        let stats = document.stats();
        info!(
            paths = stats.paths,
            operations = stats.operations,
            tags = stats.tags,
            request_schemas = stats.request_schemas,
            responses = stats.responses,
            "assembled document"
        );

        document
    }
}

/// Build a document with the given configuration and overrides (convenience function)
pub fn generate_document(
    nodes: &[ApiNode],
    config: GeneratorConfig,
    overrides: OverrideTable,
) -> OpenApiDocument {
    DocumentBuilder::new(config)
        .with_overrides(overrides)
        .build(nodes)
}
