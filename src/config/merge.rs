//! Final assembly of configuration layers
//!
//! Layers are merged in precedence order (first is base, last wins):
//! - Append fields: accumulate, skipping values already present
//! - Everything else: structural deep merge, later layer wins at every depth

use config_tree::{as_list, ConfigMap, FieldKind, FieldPolicy};
use serde_json::Value;

/// Deep merge two JSON values.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive)
/// - Arrays: REPLACE (second wins entirely)
/// - Scalars: override (second wins)
/// - Null: override (null can override any value)
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Merge layers in order. Append fields keep accumulating; every other key
/// goes through [`deep_merge`].
pub fn assemble<'a, I>(policy: &FieldPolicy, layers: I) -> ConfigMap
where
    I: IntoIterator<Item = &'a ConfigMap>,
{
    let mut merged = ConfigMap::new();
    for layer in layers {
        for (key, value) in layer {
            let combined = match (policy.classify(key), merged.remove(key)) {
                (_, None) => value.clone(),
                (Some(FieldKind::Append), Some(existing)) => accumulate(existing, value.clone()),
                (_, Some(existing)) => deep_merge(existing, value.clone()),
            };
            merged.insert(key.clone(), combined);
        }
    }
    merged
}

fn accumulate(existing: Value, incoming: Value) -> Value {
    let mut items = as_list(existing);
    for item in as_list(incoming) {
        if !items.contains(&item) {
            items.push(item);
        }
    }
    Value::Array(items)
}
