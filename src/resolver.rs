//! Per-unit configuration resolution.

use config_tree::{lookup, CompilerError, ConfigMap, FieldPolicy, TreeLookup};
use tracing::debug;

use crate::adapter::Adapter;
use crate::config::{assemble, ConfigLayer, EffectiveConfig, LayerOrigin, NodeDefaults, ReportError};
use crate::fqn::Fqn;
use crate::node_type::NodeType;
use crate::project::ProjectScope;

/// Resolves the effective configuration of one unit.
///
/// The active project is the one being built; the owning project is where
/// the unit is declared. They are the same for first-party units.
///
/// Resolution order:
///
/// - first-party unit: defaults, active project tree, in-unit overrides
/// - dependency unit: defaults, owning project tree, in-unit overrides,
///   active project tree
///
/// Nothing is cached: every [`ConfigResolver::resolve`] call recomputes from
/// the project trees and the current in-unit overrides. One resolver serves
/// one unit; resolve units in parallel with one resolver each.
pub struct ConfigResolver<'a, P: ProjectScope + ?Sized, A: Adapter + ?Sized> {
    active: &'a P,
    own: &'a P,
    adapter: &'a A,
    policy: FieldPolicy,
    fqn: Fqn,
    node_type: NodeType,
    in_unit: ConfigMap,
}

impl<'a, P: ProjectScope + ?Sized, A: Adapter + ?Sized> ConfigResolver<'a, P, A> {
    /// Create a resolver. The adapter's specific fields are read once here.
    pub fn new(active: &'a P, own: &'a P, adapter: &'a A, fqn: Fqn, node_type: NodeType) -> Self {
        let policy = FieldPolicy::new(adapter.specific_configs());
        Self {
            active,
            own,
            adapter,
            policy,
            fqn,
            node_type,
            in_unit: ConfigMap::new(),
        }
    }

    pub fn fqn(&self) -> &Fqn {
        &self.fqn
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    /// Overrides accumulated from the unit's inline declarations.
    pub fn in_unit_config(&self) -> &ConfigMap {
        &self.in_unit
    }

    /// True when the unit is declared in a project other than the one being
    /// built.
    pub fn is_dependency(&self) -> bool {
        self.active.project_name() != self.own.project_name()
    }

    /// Record one inline declaration for this unit.
    ///
    /// Aliases are translated by the adapter first. Append fields extend,
    /// dict-union fields union, everything else overwrites.
    ///
    /// # Errors
    ///
    /// Fails with [`CompilerError::InvalidConfigField`] when a dict-union
    /// field is not a mapping; earlier overrides are kept intact.
    pub fn update(&mut self, overrides: ConfigMap) -> Result<(), CompilerError> {
        let translated = self.adapter.translate_aliases(overrides);
        self.policy.merge_inline(&mut self.in_unit, translated)
    }

    /// Compute the unit's effective configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`CompilerError::InvalidConfigField`] when a project tree
    /// assigns a non-mapping value to a dict-union field.
    pub fn resolve(&self) -> Result<ConfigMap, CompilerError> {
        let layers = self.layers()?;
        Ok(assemble(&self.policy, layers.iter().map(|(_, config)| config)))
    }

    /// Like [`ConfigResolver::resolve`], with layer provenance and a
    /// fingerprint.
    pub fn report(&self) -> Result<EffectiveConfig, ReportError> {
        let layers = self.layers()?;
        let config = assemble(&self.policy, layers.iter().map(|(_, config)| config));
        let provenance = layers.into_iter().map(|(layer, _)| layer).collect();
        EffectiveConfig::new(self.fqn.clone(), self.node_type, config, provenance)
    }

    fn layers(&self) -> Result<Vec<(ConfigLayer, ConfigMap)>, CompilerError> {
        let defaults = NodeDefaults::for_node_type(self.node_type).to_map();
        let active = self.project_contribution(self.active)?;
        let active_layer = ConfigLayer::project(
            LayerOrigin::ActiveProject,
            self.active.project_name(),
            active.matched_segments,
        );

        let mut layers = vec![(ConfigLayer::defaults(), defaults)];
        if self.is_dependency() {
            let own = self.project_contribution(self.own)?;
            debug!(
                fqn = %self.fqn,
                active = self.active.project_name(),
                own = self.own.project_name(),
                "resolving dependency unit"
            );
            layers.push((
                ConfigLayer::project(
                    LayerOrigin::OwnProject,
                    self.own.project_name(),
                    own.matched_segments,
                ),
                own.config,
            ));
            layers.push((ConfigLayer::in_unit(), self.in_unit.clone()));
            layers.push((active_layer, active.config));
        } else {
            debug!(fqn = %self.fqn, project = self.active.project_name(), "resolving unit");
            layers.push((active_layer, active.config));
            layers.push((ConfigLayer::in_unit(), self.in_unit.clone()));
        }
        Ok(layers)
    }

    fn project_contribution(&self, project: &P) -> Result<TreeLookup, CompilerError> {
        let tree = match self.node_type {
            NodeType::Seed => project.seeds(),
            NodeType::Snapshot => None,
            NodeType::Model | NodeType::Test => project.models(),
        };
        lookup(&self.policy, tree, self.fqn.segments())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::AdapterDescriptor;
    use crate::project::Project;
    use serde_json::{json, Value};

    fn map(value: Value) -> ConfigMap {
        match value {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    fn fqn(path: &str) -> Fqn {
        path.parse().unwrap()
    }

    #[test]
    fn test_same_project_in_unit_beats_tree() {
        let project = Project::new("p").with_models(map(json!({
            "materialized": "table",
            "p": {"schema": "tree_schema"}
        })));
        let adapter = AdapterDescriptor::plain();
        let mut resolver =
            ConfigResolver::new(&project, &project, &adapter, fqn("p.orders"), NodeType::Model);
        resolver
            .update(map(json!({"materialized": "incremental"})))
            .unwrap();

        let config = resolver.resolve().unwrap();
        assert_eq!(config["materialized"], "incremental");
        assert_eq!(config["schema"], "tree_schema");
        assert_eq!(config["enabled"], true);
        assert!(!resolver.is_dependency());
    }

    #[test]
    fn test_dependency_active_project_wins() {
        let active = Project::new("root").with_models(map(json!({
            "dep": {"materialized": "table"}
        })));
        let own = Project::new("dep").with_models(map(json!({
            "materialized": "ephemeral",
            "dep": {"schema": "dep_schema"}
        })));
        let adapter = AdapterDescriptor::plain();
        let mut resolver =
            ConfigResolver::new(&active, &own, &adapter, fqn("dep.model"), NodeType::Model);
        resolver.update(map(json!({"materialized": "view"}))).unwrap();

        let config = resolver.resolve().unwrap();
        assert_eq!(config["materialized"], "table");
        assert_eq!(config["schema"], "dep_schema");
        assert!(resolver.is_dependency());
    }

    #[test]
    fn test_snapshot_searches_no_tree() {
        let project = Project::new("p").with_models(map(json!({"materialized": "table"})));
        let adapter = AdapterDescriptor::plain();
        let resolver =
            ConfigResolver::new(&project, &project, &adapter, fqn("p.snap"), NodeType::Snapshot);

        let config = resolver.resolve().unwrap();
        assert_eq!(config["materialized"], "snapshot");
        assert_eq!(config["tags"], json!([]));
        assert_eq!(config["vars"], json!({}));
    }

    #[test]
    fn test_resolve_recomputes_after_update() {
        let project = Project::new("p");
        let adapter = AdapterDescriptor::plain();
        let mut resolver =
            ConfigResolver::new(&project, &project, &adapter, fqn("p.m"), NodeType::Model);

        assert_eq!(resolver.resolve().unwrap()["tags"], json!([]));
        resolver.update(map(json!({"tags": "x"}))).unwrap();
        assert_eq!(resolver.resolve().unwrap()["tags"], json!(["x"]));
    }

    #[test]
    fn test_update_translates_aliases() {
        let project = Project::new("p");
        let adapter = AdapterDescriptor::postgres();
        let mut resolver =
            ConfigResolver::new(&project, &project, &adapter, fqn("p.m"), NodeType::Model);
        resolver
            .update(map(json!({"dbname": "warehouse", "unlogged": true})))
            .unwrap();

        assert_eq!(
            resolver.in_unit_config(),
            &map(json!({"database": "warehouse", "unlogged": true}))
        );
    }

    #[test]
    fn test_report_layers_follow_precedence() {
        let active = Project::new("root");
        let own = Project::new("dep");
        let adapter = AdapterDescriptor::plain();
        let resolver =
            ConfigResolver::new(&active, &own, &adapter, fqn("dep.m"), NodeType::Model);

        let report = resolver.report().unwrap();
        let origins: Vec<LayerOrigin> = report.layers.iter().map(|l| l.origin).collect();
        assert_eq!(
            origins,
            vec![
                LayerOrigin::Defaults,
                LayerOrigin::OwnProject,
                LayerOrigin::InUnit,
                LayerOrigin::ActiveProject,
            ]
        );
        assert_eq!(report.layers[1].project.as_deref(), Some("dep"));
    }
}
