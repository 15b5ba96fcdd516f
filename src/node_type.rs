//! Unit kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of unit being configured.
///
/// Selects the default materialization and which project tree is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Model,
    Seed,
    Snapshot,
    Test,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Model => "model",
            NodeType::Seed => "seed",
            NodeType::Snapshot => "snapshot",
            NodeType::Test => "test",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized node type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node type: {0} (expected model, seed, snapshot or test)")]
pub struct UnknownNodeType(pub String);

impl FromStr for NodeType {
    type Err = UnknownNodeType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "model" => Ok(NodeType::Model),
            "seed" => Ok(NodeType::Seed),
            "snapshot" => Ok(NodeType::Snapshot),
            "test" => Ok(NodeType::Test),
            _ => Err(UnknownNodeType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for name in ["model", "seed", "snapshot", "test"] {
            let node_type: NodeType = name.parse().unwrap();
            assert_eq!(node_type.to_string(), name);
        }
        assert_eq!("Seed".parse::<NodeType>().unwrap(), NodeType::Seed);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "macro".parse::<NodeType>().unwrap_err();
        assert!(err.to_string().contains("macro"));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&NodeType::Snapshot).unwrap();
        assert_eq!(json, "\"snapshot\"");
    }
}
