//! Depth-first traversal of the API tree

use crate::operation::OperationBuilder;
use crate::registry::SchemaRegistry;
use pve_openapi_generator_common::ApiNode;
use tracing::debug;

/// Visit `nodes` in pre-order, registering every node that declares methods
pub(crate) fn walk(nodes: &[ApiNode], builder: &OperationBuilder<'_>, registry: &mut SchemaRegistry) {
    for node in nodes {
        visit(node, builder, registry);
    }
}

fn visit(node: &ApiNode, builder: &OperationBuilder<'_>, registry: &mut SchemaRegistry) {
    if node.has_methods() {
        debug!(route = %node.path, methods = node.methods.len(), "registering path");
        registry.register_path(&node.path);

        for (method, definition) in &node.methods {
            let method = method.to_lowercase();
            builder.build(&node.path, &method, definition, registry);
        }
    }

    for child in &node.children {
        visit(child, builder, registry);
    }
}
