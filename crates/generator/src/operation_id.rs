//! Operation-id derivation
//!
//! `post /nodes/{node}/qemu` becomes `createNodesSingleQemu`: every segment
//! is capitalized and concatenated, placeholders become `Single`, and the
//! HTTP method is mapped to a verb prefix.

use pve_openapi_generator_common::OverrideTable;

/// Token substituted for every `{placeholder}` segment
const PLACEHOLDER_TOKEN: &str = "Single";

/// Read-only lookup of preferred operation ids
#[cfg_attr(test, mockall::automock)]
pub trait OperationIdOverrides {
    /// Preferred id for a derived one, if any
    fn lookup(&self, derived: &str) -> Option<String>;
}

impl OperationIdOverrides for OverrideTable {
    fn lookup(&self, derived: &str) -> Option<String> {
        OverrideTable::lookup(self, derived).map(str::to_string)
    }
}

/// Uppercase the first character, leave the rest untouched
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Verb prefix for a lower-case HTTP method
pub fn method_verb(method: &str) -> &str {
    match method {
        "post" => "create",
        "put" | "patch" => "update",
        other => other,
    }
}

/// Whether a route segment is a `{placeholder}`
pub(crate) fn is_placeholder(segment: &str) -> bool {
    segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// Derive the mechanical operation id for a lower-case method and route
///
/// # Examples
/// ```
/// use pve_openapi_generator_generator::derive_operation_id;
///
/// assert_eq!(derive_operation_id("post", "/nodes/{node}/qemu"), "createNodesSingleQemu");
/// assert_eq!(derive_operation_id("get", "/cluster/ha/groups"), "getClusterHaGroups");
/// ```
pub fn derive_operation_id(method: &str, route: &str) -> String {
    let mut id = method_verb(method).to_string();

    for segment in route.split('/').filter(|s| !s.is_empty()) {
        if is_placeholder(segment) {
            id.push_str(PLACEHOLDER_TOKEN);
        } else {
            let stripped: String = segment.chars().filter(|c| !matches!(c, '-' | '_')).collect();
            id.push_str(&capitalize_first(&stripped));
        }
    }

    id
}

/// Derive an id and apply the override table
pub fn resolve_operation_id(
    method: &str,
    route: &str,
    overrides: &dyn OperationIdOverrides,
) -> String {
    let derived = derive_operation_id(method, route);
    overrides.lookup(&derived).unwrap_or(derived)
}
