//! Per-node-type defaults (first layer)

use config_tree::ConfigMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node_type::NodeType;

/// Values every effective configuration starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDefaults {
    /// Whether the unit takes part in the build (default: true)
    pub enabled: bool,

    /// Materialization (default: "view"; "seed" / "snapshot" for those kinds)
    pub materialized: String,

    /// Test failure severity (tests only: "ERROR")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

impl Default for NodeDefaults {
    fn default() -> Self {
        Self::for_node_type(NodeType::Model)
    }
}

impl NodeDefaults {
    pub fn for_node_type(node_type: NodeType) -> Self {
        let materialized = match node_type {
            NodeType::Seed => "seed",
            NodeType::Snapshot => "snapshot",
            NodeType::Model | NodeType::Test => "view",
        };
        let severity = (node_type == NodeType::Test).then(|| "ERROR".to_string());

        Self {
            enabled: true,
            materialized: materialized.to_string(),
            severity,
        }
    }

    /// Convert to a configuration layer for merging
    pub fn to_map(&self) -> ConfigMap {
        let mut config = ConfigMap::new();
        config.insert("enabled".to_string(), Value::Bool(self.enabled));
        config.insert(
            "materialized".to_string(),
            Value::String(self.materialized.clone()),
        );
        if let Some(severity) = &self.severity {
            config.insert("severity".to_string(), Value::String(severity.clone()));
        }
        config
    }
}
