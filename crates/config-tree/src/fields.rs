//! Configuration field classification.
//!
//! Every recognized key belongs to exactly one [`FieldKind`]. The three
//! static sets are fixed; the adapter-specific set is supplied by the
//! backend when a [`FieldPolicy`] is built.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use tracing::warn;

/// Flat configuration mapping, keyed by field name.
pub type ConfigMap = Map<String, Value>;

/// Fields whose sequence values accumulate across scopes.
pub const APPEND_FIELDS: &[&str] = &["pre-hook", "post-hook", "tags"];

/// Fields whose mapping values are unioned key-wise across scopes.
pub const DICT_UNION_FIELDS: &[&str] = &["vars", "column_types", "quoting", "persist_docs"];

/// Fields replaced outright by the most specific source.
pub const CLOBBER_FIELDS: &[&str] = &[
    "alias",
    "schema",
    "enabled",
    "materialized",
    "unique_key",
    "database",
    "severity",
    "docs",
    "incremental_strategy",
];

/// How a configuration key merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Append,
    DictUnion,
    Clobber,
    AdapterSpecific,
}

impl FieldKind {
    /// True for kinds where a later value replaces the earlier one.
    pub fn replaces(self) -> bool {
        matches!(self, FieldKind::Clobber | FieldKind::AdapterSpecific)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Append => write!(f, "append"),
            FieldKind::DictUnion => write!(f, "dict_union"),
            FieldKind::Clobber => write!(f, "clobber"),
            FieldKind::AdapterSpecific => write!(f, "adapter_specific"),
        }
    }
}

/// Field classification for one backend.
///
/// Holds the adapter-specific field names next to the static sets. Built
/// once per resolver and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPolicy {
    adapter_specific: BTreeSet<String>,
}

impl FieldPolicy {
    /// Build a policy recognizing the given adapter-specific fields.
    ///
    /// Names that already belong to a static set keep their static kind so
    /// the classification stays disjoint.
    pub fn new<I, S>(adapter_specific: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut extra = BTreeSet::new();
        for name in adapter_specific {
            let name = name.into();
            if static_kind(&name).is_some() {
                warn!(field = %name, "adapter-specific field shadows a built-in field; ignoring");
                continue;
            }
            extra.insert(name);
        }
        Self {
            adapter_specific: extra,
        }
    }

    /// Adapter-specific field names recognized by this policy.
    pub fn adapter_specific(&self) -> &BTreeSet<String> {
        &self.adapter_specific
    }

    /// Classify a key, or `None` if it is not a configuration field.
    pub fn classify(&self, key: &str) -> Option<FieldKind> {
        static_kind(key).or_else(|| {
            self.adapter_specific
                .contains(key)
                .then_some(FieldKind::AdapterSpecific)
        })
    }

    pub fn is_recognized(&self, key: &str) -> bool {
        self.classify(key).is_some()
    }

    /// All recognized fields with their kind, static sets first.
    pub fn fields(&self) -> Vec<(&str, FieldKind)> {
        APPEND_FIELDS
            .iter()
            .map(|k| (*k, FieldKind::Append))
            .chain(DICT_UNION_FIELDS.iter().map(|k| (*k, FieldKind::DictUnion)))
            .chain(CLOBBER_FIELDS.iter().map(|k| (*k, FieldKind::Clobber)))
            .chain(
                self.adapter_specific
                    .iter()
                    .map(|k| (k.as_str(), FieldKind::AdapterSpecific)),
            )
            .collect()
    }

    /// Accumulator seed: `[]` for every append field, `{}` for every
    /// dict-union field.
    pub fn empty_accumulator() -> ConfigMap {
        let mut config = ConfigMap::new();
        for key in APPEND_FIELDS {
            config.insert((*key).to_string(), Value::Array(Vec::new()));
        }
        for key in DICT_UNION_FIELDS {
            config.insert((*key).to_string(), Value::Object(ConfigMap::new()));
        }
        config
    }
}

fn static_kind(key: &str) -> Option<FieldKind> {
    if APPEND_FIELDS.contains(&key) {
        Some(FieldKind::Append)
    } else if DICT_UNION_FIELDS.contains(&key) {
        Some(FieldKind::DictUnion)
    } else if CLOBBER_FIELDS.contains(&key) {
        Some(FieldKind::Clobber)
    } else {
        None
    }
}
