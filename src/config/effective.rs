//! Effective configuration with provenance
//!
//! Captures the merged configuration of one unit plus the layers that
//! produced it, in precedence order.

use config_tree::{CompilerError, ConfigMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::fqn::Fqn;
use crate::node_type::NodeType;

/// Schema version for effective_config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "unit-config/effective_config@1";

/// Where a configuration layer came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LayerOrigin {
    Defaults,
    OwnProject,
    InUnit,
    ActiveProject,
}

/// A contributing layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigLayer {
    pub origin: LayerOrigin,

    /// Project whose tree produced this layer (project layers only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// FQN segments found in the project tree (project layers only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_segments: Option<usize>,
}

impl ConfigLayer {
    pub fn defaults() -> Self {
        Self {
            origin: LayerOrigin::Defaults,
            project: None,
            matched_segments: None,
        }
    }

    pub fn in_unit() -> Self {
        Self {
            origin: LayerOrigin::InUnit,
            project: None,
            matched_segments: None,
        }
    }

    pub fn project(origin: LayerOrigin, project: &str, matched_segments: usize) -> Self {
        Self {
            origin,
            project: Some(project.to_string()),
            matched_segments: Some(matched_segments),
        }
    }
}

/// Effective configuration of one unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectiveConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    pub fqn: Fqn,

    pub node_type: NodeType,

    /// The merged configuration object
    pub config: ConfigMap,

    /// Contributing layers in precedence order (last wins)
    pub layers: Vec<ConfigLayer>,

    /// SHA-256 hex digest of the JCS (RFC 8785) form of `config`
    pub fingerprint: String,
}

impl EffectiveConfig {
    pub fn new(
        fqn: Fqn,
        node_type: NodeType,
        config: ConfigMap,
        layers: Vec<ConfigLayer>,
    ) -> Result<Self, ReportError> {
        let fingerprint = Self::compute_fingerprint(&config)?;
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            fqn,
            node_type,
            config,
            layers,
            fingerprint,
        })
    }

    /// fingerprint = SHA-256 hex digest of JCS(config)
    pub fn compute_fingerprint(config: &ConfigMap) -> Result<String, ReportError> {
        let jcs_bytes = serde_json_canonicalizer::to_vec(config)
            .map_err(|e| ReportError::JcsError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Serialize to JSON (pretty printed)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.config.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }

    /// Get a sequence value as strings, skipping non-string items
    pub fn get_strings(&self, path: &str) -> Vec<&str> {
        self.get(path)
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.get_bool("enabled").unwrap_or(true)
    }
}

/// Errors producing an effective configuration report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Compiler(#[from] CompilerError),

    #[error("JCS error: {0}")]
    JcsError(String),
}
