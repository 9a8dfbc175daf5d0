//! Type shape to OpenAPI schema translation
//!
//! Both translators are total: every [`ShapeKind`] maps to a schema, and
//! missing `items`/`properties` simply stay absent.

use crate::strategy::ResponseStrategy;
use indexmap::IndexMap;
use pve_openapi_generator_common::{Schema, ShapeKind, TypeShape};
use tracing::debug;

/// Translate a shape for use in a request body or parameter.
/// Descriptions are not carried over.
pub fn request_schema(shape: &TypeShape) -> Schema {
    let mut schema = Schema::new(shape.schema_type());

    match &shape.kind {
        ShapeKind::Array(Some(items)) => {
            schema.items = Some(Box::new(request_schema(items)));
        }
        ShapeKind::Object(Some(properties)) => {
            schema.properties = Some(
                properties
                    .iter()
                    .map(|p| (p.key.source_name(), request_schema(&p.shape)))
                    .collect(),
            );
        }
        _ => {}
    }

    schema
}

/// Translate a shape for use in a response payload.
/// Every level carries a description, empty when the source has none.
pub fn response_schema(shape: &TypeShape, strategy: &dyn ResponseStrategy) -> Schema {
    let mut schema = Schema::new(shape.schema_type());
    schema.description = Some(shape.description.clone().unwrap_or_default());

    match &shape.kind {
        ShapeKind::Array(Some(items)) => {
            schema.items = Some(Box::new(response_schema(items, strategy)));
        }
        ShapeKind::Object(Some(properties)) => {
            let mut translated = IndexMap::with_capacity(properties.len());
            for property in properties {
                let property_schema = response_schema(&property.shape, strategy);
                // Later keys replace earlier ones but keep their position
                for name in strategy.property_names(&property.key) {
                    if translated.insert(name.clone(), property_schema.clone()).is_some() {
                        debug!(
                            property = %name,
                            "response property defined twice, keeping the later one"
                        );
                    }
                }
            }
            schema.properties = Some(translated);
        }
        _ => {}
    }

    schema
}
