//! Backend descriptors.
//!
//! An adapter contributes two things to resolution: extra configuration
//! field names it understands, and alias rules rewriting inline keys to
//! their canonical names.

use config_tree::ConfigMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::trace;

/// Backend collaborator consulted by the resolver.
pub trait Adapter {
    /// Extra configuration field names recognized by this backend.
    fn specific_configs(&self) -> BTreeSet<String>;

    /// Rewrite aliased keys in an inline declaration to canonical names.
    fn translate_aliases(&self, config: ConfigMap) -> ConfigMap;
}

/// Unknown built-in adapter name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown adapter: {0}")]
pub struct AdapterError(pub String);

/// Data-driven adapter: a name, its extra fields and its alias table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterDescriptor {
    pub name: String,

    #[serde(default)]
    pub specific_configs: BTreeSet<String>,

    /// alias -> canonical key
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl AdapterDescriptor {
    /// Names accepted by [`AdapterDescriptor::builtin`].
    pub const BUILTIN: &'static [&'static str] = &["default", "postgres"];

    /// Adapter with no extra fields and no aliases.
    pub fn plain() -> Self {
        Self {
            name: "default".to_string(),
            ..Self::default()
        }
    }

    pub fn postgres() -> Self {
        Self {
            name: "postgres".to_string(),
            specific_configs: ["unlogged".to_string()].into_iter().collect(),
            aliases: [("dbname", "database"), ("pass", "password")]
                .into_iter()
                .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
                .collect(),
        }
    }

    /// Look up a built-in descriptor by name.
    pub fn builtin(name: &str) -> Result<Self, AdapterError> {
        match name {
            "default" => Ok(Self::plain()),
            "postgres" => Ok(Self::postgres()),
            other => Err(AdapterError(other.to_string())),
        }
    }
}

impl Adapter for AdapterDescriptor {
    fn specific_configs(&self) -> BTreeSet<String> {
        self.specific_configs.clone()
    }

    /// An alias is only applied when the canonical key is not also present.
    fn translate_aliases(&self, config: ConfigMap) -> ConfigMap {
        let mut translated = ConfigMap::new();
        let mut aliased = Vec::new();
        for (key, value) in config {
            match self.aliases.get(&key) {
                Some(canonical) => aliased.push((key, canonical.clone(), value)),
                None => {
                    translated.insert(key, value);
                }
            }
        }
        for (alias, canonical, value) in aliased {
            if translated.contains_key(&canonical) {
                trace!(alias = %alias, canonical = %canonical, "canonical key already set; alias ignored");
                continue;
            }
            translated.insert(canonical, value);
        }
        translated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn map(value: Value) -> ConfigMap {
        match value {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(AdapterDescriptor::builtin("postgres").unwrap().name, "postgres");
        assert!(AdapterDescriptor::builtin("default")
            .unwrap()
            .specific_configs()
            .is_empty());
        assert_eq!(
            AdapterDescriptor::builtin("oracle").unwrap_err(),
            AdapterError("oracle".to_string())
        );
    }

    #[test]
    fn test_postgres_recognizes_unlogged() {
        assert!(AdapterDescriptor::postgres()
            .specific_configs()
            .contains("unlogged"));
    }

    #[test]
    fn test_translate_aliases() {
        let adapter = AdapterDescriptor::postgres();
        let translated = adapter.translate_aliases(map(json!({"dbname": "analytics", "tags": "x"})));
        assert_eq!(translated, map(json!({"database": "analytics", "tags": "x"})));
    }

    #[test]
    fn test_canonical_key_beats_alias() {
        let adapter = AdapterDescriptor::postgres();
        let translated =
            adapter.translate_aliases(map(json!({"dbname": "aliased", "database": "canonical"})));
        assert_eq!(translated, map(json!({"database": "canonical"})));
    }
}
