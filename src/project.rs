//! Project scopes.
//!
//! A project exposes two configuration trees, `models` and `seeds`, keyed by
//! FQN segment. The engine only reads them.

use config_tree::ConfigMap;
use serde::{Deserialize, Serialize};

/// Read-only view of one project's scoped configuration.
pub trait ProjectScope {
    /// Identity used to tell first-party units from dependency units.
    fn project_name(&self) -> &str;

    /// Configuration tree for models and tests.
    fn models(&self) -> Option<&ConfigMap>;

    /// Configuration tree for seeds.
    fn seeds(&self) -> Option<&ConfigMap>;
}

/// In-memory project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<ConfigMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeds: Option<ConfigMap>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: None,
            seeds: None,
        }
    }

    pub fn with_models(mut self, models: ConfigMap) -> Self {
        self.models = Some(models);
        self
    }

    pub fn with_seeds(mut self, seeds: ConfigMap) -> Self {
        self.seeds = Some(seeds);
        self
    }
}

impl ProjectScope for Project {
    fn project_name(&self) -> &str {
        &self.name
    }

    fn models(&self) -> Option<&ConfigMap> {
        self.models.as_ref()
    }

    fn seeds(&self) -> Option<&ConfigMap> {
        self.seeds.as_ref()
    }
}
