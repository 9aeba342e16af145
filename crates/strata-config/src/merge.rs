//! Deep-merge engine for configuration documents.
//!
//! Merging is a pure structural operation over JSON trees: objects merge
//! recursively per key, everything else is replaced wholesale by the overlay.
//! Layers are always applied strictly left-to-right in the fixed precedence
//! order global → local → named; associativity is not relied on.

use serde_json::Value;

use crate::{ConfigDocument, Result};

/// Merge `overlay` on top of `base`, returning a new tree.
///
/// For each key in `overlay`: if both sides hold objects, merge recursively;
/// otherwise the overlay value wins, including when the two sides disagree on
/// shape (object vs. scalar vs. array). Keys only present in `base` are
/// preserved. Neither input is mutated.
pub fn merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut result = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let merged = match result.get(key) {
                    Some(base_value) if base_value.is_object() && overlay_value.is_object() => {
                        merge(base_value, overlay_value)
                    }
                    _ => overlay_value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Value::Object(result)
        }
        _ => overlay.clone(),
    }
}

/// Merge two typed documents through their JSON form.
pub fn merge_documents(base: &ConfigDocument, overlay: &ConfigDocument) -> Result<ConfigDocument> {
    let merged = merge(&base.to_value()?, &overlay.to_value()?);
    ConfigDocument::from_value(merged)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_identity_empty_overlay() {
        let doc = json!({"a": 1, "b": {"c": [1, 2]}});
        assert_eq!(merge(&doc, &json!({})), doc);
    }

    #[test]
    fn test_merge_identity_empty_base() {
        let doc = json!({"a": 1, "b": {"c": [1, 2]}});
        assert_eq!(merge(&json!({}), &doc), doc);
    }

    #[test]
    fn test_merge_disjoint_union() {
        let base = json!({"a": 1, "nested": {"x": true}});
        let overlay = json!({"b": 2, "other": {"y": false}});
        assert_eq!(
            merge(&base, &overlay),
            json!({"a": 1, "b": 2, "nested": {"x": true}, "other": {"y": false}})
        );
    }

    #[test]
    fn test_merge_recursive_override() {
        let base = json!({"settings": {"theme": "dark", "format": "json"}});
        let overlay = json!({"settings": {"theme": "light"}});
        assert_eq!(
            merge(&base, &overlay),
            json!({"settings": {"theme": "light", "format": "json"}})
        );
    }

    #[test]
    fn test_merge_scalar_replaces_object() {
        let base = json!({"key": {"nested": 1}});
        let overlay = json!({"key": "plain"});
        assert_eq!(merge(&base, &overlay), json!({"key": "plain"}));
    }

    #[test]
    fn test_merge_object_replaces_scalar() {
        let base = json!({"key": "plain"});
        let overlay = json!({"key": {"nested": 1}});
        assert_eq!(merge(&base, &overlay), json!({"key": {"nested": 1}}));
    }

    #[test]
    fn test_merge_arrays_replaced_wholesale() {
        let base = json!({"list": [1, 2, 3]});
        let overlay = json!({"list": [4]});
        assert_eq!(merge(&base, &overlay), json!({"list": [4]}));
    }

    #[test]
    fn test_merge_inputs_not_mutated() {
        let base = json!({"a": {"b": 1}});
        let overlay = json!({"a": {"b": 2}});
        let base_before = base.clone();
        let overlay_before = overlay.clone();
        let _ = merge(&base, &overlay);
        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn test_merge_left_to_right_order() {
        // global → local → named applied in sequence; the last layer wins.
        let global = json!({"settings": {"theme": "dark", "level": "info"}});
        let local = json!({"settings": {"theme": "light"}});
        let named = json!({"settings": {"level": "debug"}});

        let effective = merge(&merge(&global, &local), &named);
        assert_eq!(
            effective,
            json!({"settings": {"theme": "light", "level": "debug"}})
        );
    }

    #[test]
    fn test_merge_documents_typed() {
        let base = ConfigDocument::default_document();
        let overlay =
            ConfigDocument::from_json(r#"{"settings": {"log_level": "debug"}}"#).unwrap();

        let merged = merge_documents(&base, &overlay).unwrap();
        assert_eq!(
            merged.settings.get("log_level"),
            Some(&serde_json::Value::from("debug"))
        );
        // Base-only keys survive.
        assert_eq!(
            merged.settings.get("output_format"),
            Some(&serde_json::Value::from("json"))
        );
    }
}
