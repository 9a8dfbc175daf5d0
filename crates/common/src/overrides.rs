//! Operation-id override table
//!
//! Maps a mechanically derived operation id to a preferred one. Loaded from
//! a JSON or YAML object of `derivedId: preferredId` pairs.

use crate::{GeneratorError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideTable {
    entries: IndexMap<String, String>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a `.json`, `.yaml` or `.yml` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!("Failed to read override table {:?}: {}", path, e))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            serde_json::from_str(&content).map_err(|e| {
                GeneratorError::Parse(format!("Failed to parse override JSON {:?}: {}", path, e))
            })
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                GeneratorError::Parse(format!("Failed to parse override YAML {:?}: {}", path, e))
            })
        }
    }

    pub fn insert(&mut self, derived: impl Into<String>, preferred: impl Into<String>) {
        self.entries.insert(derived.into(), preferred.into());
    }

    /// Preferred id for `derived`, if one is configured
    pub fn lookup(&self, derived: &str) -> Option<&str> {
        self.entries.get(derived).map(String::as_str)
    }

    /// Preferred id for `derived`, or `derived` itself
    pub fn resolve<'a>(&'a self, derived: &'a str) -> &'a str {
        self.lookup(derived).unwrap_or(derived)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OverrideTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
