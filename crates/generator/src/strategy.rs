//! Response emission strategies
//!
//! The schema translator never looks at the configured mode. It asks the
//! strategy which concrete keys a property produces and hands the finished
//! payload to [`ResponseStrategy::wrap`].

use pve_openapi_generator_common::{EnvelopeMode, FieldKey, GeneratorConfig, Schema, SchemaType};

/// Shapes a translated response payload
pub trait ResponseStrategy {
    /// Concrete property names emitted for a source key
    fn property_names(&self, key: &FieldKey) -> Vec<String>;

    /// Turn the translated payload into the registered response schema
    fn wrap(&self, payload: Schema) -> Schema;
}

/// Emits the payload as-is; `foo[n]` keys stay literal
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatResponse;

impl ResponseStrategy for FlatResponse {
    fn property_names(&self, key: &FieldKey) -> Vec<String> {
        vec![key.source_name()]
    }

    fn wrap(&self, payload: Schema) -> Schema {
        payload
    }
}

/// Wraps the payload as `{data, errors}` and expands `foo[n]` to `foo0..foo{bound-1}`
#[derive(Debug, Clone, Copy)]
pub struct EnvelopedResponse {
    bound: u32,
}

impl EnvelopedResponse {
    pub fn new(bound: u32) -> Self {
        Self { bound }
    }
}

impl ResponseStrategy for EnvelopedResponse {
    fn property_names(&self, key: &FieldKey) -> Vec<String> {
        match key {
            FieldKey::Named(name) => vec![name.clone()],
            FieldKey::RepeatedSibling { .. } => (0..self.bound)
                .map(|i| format!("{}{}", key.base_name(), i))
                .collect(),
        }
    }

    fn wrap(&self, payload: Schema) -> Schema {
        let mut properties = indexmap::IndexMap::with_capacity(2);
        properties.insert("data".to_string(), payload);
        properties.insert("errors".to_string(), Schema::string_array());

        Schema {
            properties: Some(properties),
            ..Schema::new(SchemaType::Object)
        }
    }
}

/// Select the strategy once per build
pub fn strategy_for(config: &GeneratorConfig) -> Box<dyn ResponseStrategy> {
    match config.envelope_mode {
        EnvelopeMode::Flat => Box::new(FlatResponse),
        EnvelopeMode::Enveloped => Box::new(EnvelopedResponse::new(config.indexed_array_bound)),
    }
}
