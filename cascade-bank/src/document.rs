//! Serialized bank form, as delivered by the literature-discovery collaborator.

use std::path::Path;

use cascade_core::errors::{BankError, CascadeResult};
use cascade_core::models::{Mechanism, Node};
use serde::{Deserialize, Serialize};

/// A versioned set of nodes and mechanisms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDocument {
    pub version: String,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub mechanisms: Vec<Mechanism>,
}

impl BankDocument {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            nodes: Vec::new(),
            mechanisms: Vec::new(),
        }
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_mechanism(mut self, mechanism: Mechanism) -> Self {
        self.mechanisms.push(mechanism);
        self
    }

    pub fn from_json_str(content: &str) -> CascadeResult<Self> {
        serde_json::from_str(content).map_err(|e| {
            BankError::InvalidDocument {
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn from_toml_str(content: &str) -> CascadeResult<Self> {
        toml::from_str(content).map_err(|e| {
            BankError::InvalidDocument {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Load a `.json` or `.toml` bank file, picked by extension.
    pub fn load(path: impl AsRef<Path>) -> CascadeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BankError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// blake3 hash of the canonical JSON encoding.
    pub fn content_hash(&self) -> CascadeResult<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}
