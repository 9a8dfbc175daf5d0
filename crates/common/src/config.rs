//! Generator configuration loaded from YAML files
//!
//! Every field has a default, so a config file only needs the keys it
//! changes. The defaults reproduce the published Proxmox VE document.

use crate::{Contact, GeneratorError, Info, Result, Server};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of `name0 ... name{N-1}` siblings an indexed property expands to
pub const DEFAULT_INDEXED_ARRAY_BOUND: u32 = 30;

/// How response payloads are emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeMode {
    /// The translated `returns` descriptor is the response schema
    #[default]
    Flat,
    /// The payload sits under `data`, next to an `errors` string array
    Enveloped,
}

/// Root structure for generator configuration files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Response emission mode
    pub envelope_mode: EnvelopeMode,

    /// Expansion bound for numbered sibling fields (enveloped mode only)
    pub indexed_array_bound: u32,

    /// Emit residual parameters of non-body methods as query parameters
    pub include_query_params: bool,

    /// Static `info` block
    pub metadata: Info,

    /// The single server entry
    pub server: Server,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            envelope_mode: EnvelopeMode::Flat,
            indexed_array_bound: DEFAULT_INDEXED_ARRAY_BOUND,
            include_query_params: false,
            metadata: Info::default(),
            server: Server::default(),
        }
    }
}

impl Default for Info {
    fn default() -> Self {
        Self {
            title: "ProxMox VE API".to_string(),
            version: "2.0".to_string(),
            description: "ProxMox VE API".to_string(),
            contact: Contact::default(),
        }
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            name: "LUMASERV Support Team".to_string(),
            email: "support@lumaserv.com".to_string(),
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            description: "local".to_string(),
            url: "https://cluster.local:8006/api2/json".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            GeneratorError::Parse(format!("Failed to parse config YAML from {:?}: {}", path, e))
        })
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn with_envelope_mode(mut self, mode: EnvelopeMode) -> Self {
        self.envelope_mode = mode;
        self
    }

    pub fn with_indexed_array_bound(mut self, bound: u32) -> Self {
        self.indexed_array_bound = bound;
        self
    }

    pub fn with_query_params(mut self, include: bool) -> Self {
        self.include_query_params = include;
        self
    }
}
