//! Configuration layering
//!
//! Effective configuration is assembled from up to four layers:
//! 1. Per-node-type defaults
//! 2. Owning project tree (dependency units only)
//! 3. In-unit overrides
//! 4. Active project tree
//!
//! For first-party units the active project tree sits between the defaults
//! and the in-unit overrides instead.

mod defaults;
mod effective;
mod merge;

pub use defaults::NodeDefaults;
pub use effective::{ConfigLayer, EffectiveConfig, LayerOrigin, ReportError};
pub use merge::{assemble, deep_merge};
