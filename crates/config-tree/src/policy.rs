//! Field-aware merge policy ("smart update").
//!
//! Merge semantics per [`FieldKind`]:
//! - Append: concatenate, skipping values already present
//! - DictUnion: shallow key-wise union, later wins
//! - Clobber / AdapterSpecific: later replaces

use serde_json::Value;

use crate::error::CompilerError;
use crate::fields::{ConfigMap, FieldKind, FieldPolicy, APPEND_FIELDS, DICT_UNION_FIELDS};

impl FieldPolicy {
    /// Merge one contribution into `acc` and return the recognized subset
    /// of the contribution.
    ///
    /// Unrecognized keys are dropped. The returned mapping lets callers tell
    /// a clobber key set at this level apart from one inherited earlier.
    ///
    /// # Errors
    ///
    /// Returns [`CompilerError::InvalidConfigField`] when a dict-union field
    /// carries a non-mapping value. `acc` is left untouched in that case.
    pub fn smart_update(
        &self,
        acc: &mut ConfigMap,
        contribution: &ConfigMap,
    ) -> Result<ConfigMap, CompilerError> {
        let relevant: ConfigMap = contribution
            .iter()
            .filter(|(key, _)| self.is_recognized(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        check_dict_fields(&relevant)?;

        for key in APPEND_FIELDS {
            if let Some(value) = relevant.get(*key) {
                append_unique(acc, key, value.clone());
            }
        }

        for key in DICT_UNION_FIELDS {
            if let Some(Value::Object(entries)) = relevant.get(*key) {
                union_into(acc, key, entries.clone());
            }
        }

        for (key, value) in &relevant {
            if self.classify(key).is_some_and(FieldKind::replaces) {
                acc.insert(key.clone(), value.clone());
            }
        }

        Ok(relevant)
    }

    /// Merge an inline declaration into a unit's override mapping.
    ///
    /// Same per-field rules as [`FieldPolicy::smart_update`], except that
    /// keys outside the classification are kept and overwrite like clobber
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns [`CompilerError::InvalidConfigField`] when a dict-union field
    /// carries a non-mapping value. `target` is left untouched in that case.
    pub fn merge_inline(
        &self,
        target: &mut ConfigMap,
        overrides: ConfigMap,
    ) -> Result<(), CompilerError> {
        check_dict_fields(&overrides)?;

        for (key, value) in overrides {
            match self.classify(&key) {
                Some(FieldKind::Append) => append_unique(target, &key, value),
                Some(FieldKind::DictUnion) => {
                    if let Value::Object(entries) = value {
                        union_into(target, &key, entries);
                    }
                }
                _ => {
                    target.insert(key, value);
                }
            }
        }
        Ok(())
    }
}

/// Wrap a scalar as a one-element sequence.
pub fn as_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

fn check_dict_fields(config: &ConfigMap) -> Result<(), CompilerError> {
    for key in DICT_UNION_FIELDS {
        match config.get(*key) {
            None | Some(Value::Object(_)) => {}
            Some(_) => return Err(CompilerError::invalid_field(key)),
        }
    }
    Ok(())
}

fn append_unique(acc: &mut ConfigMap, key: &str, value: Value) {
    let mut current = acc.remove(key).map(as_list).unwrap_or_default();
    for item in as_list(value) {
        if !current.contains(&item) {
            current.push(item);
        }
    }
    acc.insert(key.to_string(), Value::Array(current));
}

fn union_into(acc: &mut ConfigMap, key: &str, entries: ConfigMap) {
    let mut current = match acc.remove(key) {
        Some(Value::Object(existing)) => existing,
        _ => ConfigMap::new(),
    };
    current.extend(entries);
    acc.insert(key.to_string(), Value::Object(current));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> ConfigMap {
        match value {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_append_preserves_first_occurrence() {
        let policy = FieldPolicy::default();
        let mut acc = FieldPolicy::empty_accumulator();
        policy
            .smart_update(&mut acc, &map(json!({"tags": ["a", "b"]})))
            .unwrap();
        policy
            .smart_update(&mut acc, &map(json!({"tags": ["b", "c"]})))
            .unwrap();
        assert_eq!(acc["tags"], json!(["a", "b", "c"]));
    }

    #[test]
    fn test_append_is_idempotent() {
        let policy = FieldPolicy::default();
        let mut acc = FieldPolicy::empty_accumulator();
        let contribution = map(json!({"post-hook": "grant select"}));
        policy.smart_update(&mut acc, &contribution).unwrap();
        policy.smart_update(&mut acc, &contribution).unwrap();
        assert_eq!(acc["post-hook"], json!(["grant select"]));
    }

    #[test]
    fn test_dict_union_is_shallow_and_right_biased() {
        let policy = FieldPolicy::default();
        let mut acc = FieldPolicy::empty_accumulator();
        policy
            .smart_update(&mut acc, &map(json!({"vars": {"x": 1, "nested": {"a": 1}}})))
            .unwrap();
        policy
            .smart_update(
                &mut acc,
                &map(json!({"vars": {"x": 2, "y": 3, "nested": {"b": 2}}})),
            )
            .unwrap();
        assert_eq!(acc["vars"], json!({"x": 2, "y": 3, "nested": {"b": 2}}));
    }

    #[test]
    fn test_clobber_takes_latest() {
        let policy = FieldPolicy::new(["unlogged"]);
        let mut acc = FieldPolicy::empty_accumulator();
        policy
            .smart_update(&mut acc, &map(json!({"materialized": "table", "unlogged": false})))
            .unwrap();
        policy
            .smart_update(&mut acc, &map(json!({"materialized": "view", "unlogged": true})))
            .unwrap();
        assert_eq!(acc["materialized"], "view");
        assert_eq!(acc["unlogged"], true);
    }

    #[test]
    fn test_returns_only_recognized_keys() {
        let policy = FieldPolicy::default();
        let mut acc = FieldPolicy::empty_accumulator();
        let touched = policy
            .smart_update(
                &mut acc,
                &map(json!({"schema": "analytics", "staging": {"enabled": false}, "bogus": 1})),
            )
            .unwrap();
        assert_eq!(touched, map(json!({"schema": "analytics"})));
        assert!(!acc.contains_key("bogus"));
        assert!(!acc.contains_key("staging"));
    }

    #[test]
    fn test_non_mapping_dict_field_leaves_accumulator() {
        let policy = FieldPolicy::default();
        let mut acc = FieldPolicy::empty_accumulator();
        policy
            .smart_update(&mut acc, &map(json!({"quoting": {"identifier": true}})))
            .unwrap();
        let before = acc.clone();

        let err = policy
            .smart_update(&mut acc, &map(json!({"tags": "late", "quoting": ["nope"]})))
            .unwrap_err();
        assert_eq!(err.field(), "quoting");
        assert_eq!(acc, before);
    }

    #[test]
    fn test_merge_inline_appends_and_overwrites() {
        let policy = FieldPolicy::default();
        let mut target = ConfigMap::new();
        policy
            .merge_inline(&mut target, map(json!({"tags": "x", "alias": "a", "sort": "id"})))
            .unwrap();
        policy
            .merge_inline(&mut target, map(json!({"tags": "y", "alias": "b"})))
            .unwrap();
        assert_eq!(target["tags"], json!(["x", "y"]));
        assert_eq!(target["alias"], "b");
        assert_eq!(target["sort"], "id");
    }

    #[test]
    fn test_merge_inline_rejects_scalar_dict_field() {
        let policy = FieldPolicy::default();
        let mut target = ConfigMap::new();
        policy
            .merge_inline(&mut target, map(json!({"column_types": {"id": "bigint"}})))
            .unwrap();

        let err = policy
            .merge_inline(&mut target, map(json!({"column_types": "not_a_mapping"})))
            .unwrap_err();
        assert!(matches!(err, CompilerError::InvalidConfigField { ref field } if field == "column_types"));
        assert_eq!(target["column_types"], json!({"id": "bigint"}));
    }

    #[test]
    fn test_as_list() {
        assert_eq!(as_list(json!("x")), vec![json!("x")]);
        assert_eq!(as_list(json!(["x", "y"])), vec![json!("x"), json!("y")]);
    }
}
