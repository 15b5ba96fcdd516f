//! Unit configuration resolution
//!
//! Computes the effective configuration of a model, seed, snapshot or test
//! from scoped project configuration trees and the unit's inline overrides,
//! applying per-field merge semantics and project precedence.

pub mod adapter;
pub mod config;
pub mod fqn;
pub mod loader;
pub mod node_type;
pub mod project;
pub mod resolver;

pub use adapter::{Adapter, AdapterDescriptor, AdapterError};
pub use config::{ConfigLayer, EffectiveConfig, LayerOrigin, NodeDefaults, ReportError};
pub use config_tree::{CompilerError, ConfigMap, FieldKind, FieldPolicy, TreeLookup};
pub use fqn::Fqn;
pub use loader::LoadError;
pub use node_type::NodeType;
pub use project::{Project, ProjectScope};
pub use resolver::ConfigResolver;
