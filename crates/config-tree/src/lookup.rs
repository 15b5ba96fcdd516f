//! FQN tree lookup.
//!
//! A configuration tree nests one sub-mapping per FQN segment. At each level
//! the recognized field names carry configuration values; every other key
//! names a child segment. A field-named key holding a mapping is read both
//! ways.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::error::CompilerError;
use crate::fields::{ConfigMap, FieldPolicy};

/// Result of walking an FQN through a configuration tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeLookup {
    /// Accumulated configuration from the root down to the deepest match.
    pub config: ConfigMap,

    /// Number of FQN segments found in the tree.
    pub matched_segments: usize,

    /// Depth that set each clobber/adapter key's winning value
    /// (0 is the tree root, n the n-th segment).
    pub origins: BTreeMap<String, usize>,
}

impl TreeLookup {
    /// Lookup result for a missing tree: append/dict defaults only.
    pub fn empty() -> Self {
        Self {
            config: FieldPolicy::empty_accumulator(),
            matched_segments: 0,
            origins: BTreeMap::new(),
        }
    }

    fn record(&mut self, policy: &FieldPolicy, touched: &ConfigMap, depth: usize) {
        for key in touched.keys() {
            if policy.classify(key).is_some_and(|kind| kind.replaces()) {
                self.origins.insert(key.clone(), depth);
            }
        }
    }
}

impl Default for TreeLookup {
    fn default() -> Self {
        Self::empty()
    }
}

/// Walk `fqn` through `tree`, merging each level's fields with `policy`.
///
/// Descent stops at the first segment that has no child mapping; the
/// remaining segments contribute nothing. A segment named like a field
/// (a `docs` folder, say) is descended into when its value is a mapping,
/// so that value counts both as the field and as the child scope. The tree
/// is only read.
///
/// # Errors
///
/// Returns [`CompilerError::InvalidConfigField`] if a level assigns a
/// non-mapping value to a dict-union field.
pub fn lookup<S: AsRef<str>>(
    policy: &FieldPolicy,
    tree: Option<&ConfigMap>,
    fqn: &[S],
) -> Result<TreeLookup, CompilerError> {
    let mut result = TreeLookup::empty();
    let Some(root) = tree else {
        trace!("no configuration tree; using empty contribution");
        return Ok(result);
    };

    let touched = policy.smart_update(&mut result.config, root)?;
    result.record(policy, &touched, 0);

    let mut level = root;
    for (index, segment) in fqn.iter().enumerate() {
        let segment = segment.as_ref();
        let child = match level.get(segment) {
            Some(Value::Object(child)) => child,
            _ => {
                debug!(segment, depth = index, "fqn segment not configured; stopping descent");
                break;
            }
        };

        let touched = policy.smart_update(&mut result.config, child)?;
        let depth = index + 1;
        trace!(segment, depth, touched = ?touched.keys().collect::<Vec<_>>(), "merged level");
        result.record(policy, &touched, depth);
        result.matched_segments = depth;
        level = child;
    }

    Ok(result)
}
