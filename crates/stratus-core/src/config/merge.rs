//! Deep merge of configuration layers.
//!
//! Objects merge key-wise and recursively; arrays and scalars from the
//! higher layer replace the lower value wholesale.

use serde_json::{Map, Value};

/// Merges `overlay` into `base`, overlay winning on conflict.
pub fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(lower)), Value::Object(higher)) => deep_merge(lower, higher),
            (_, value) => {
                let _ = base.insert(key, value);
            }
        }
    }
}

/// Folds layers, lowest priority first, into one map.
pub fn merge_layers<I>(layers: I) -> Map<String, Value>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    layers.into_iter().fold(Map::new(), |mut acc, layer| {
        deep_merge(&mut acc, layer);
        acc
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => Map::new(),
        }
    }

    #[test]
    fn nested_objects_merge_key_wise() {
        let merged = merge_layers([
            obj(json!({"a": {"x": 1, "y": 2}})),
            obj(json!({"a": {"y": 3, "z": 4}})),
        ]);
        assert_eq!(Value::Object(merged), json!({"a": {"x": 1, "y": 3, "z": 4}}));
    }

    #[test]
    fn highest_of_five_layers_wins() {
        let merged = merge_layers([
            obj(json!({"key": "fallback", "fallbackOnly": 1})),
            obj(json!({"key": "platform"})),
            obj(json!({"key": "environment"})),
            obj(json!({"key": "component"})),
            obj(json!({"key": "policy"})),
        ]);
        assert_eq!(merged["key"], "policy");
        assert_eq!(merged["fallbackOnly"], 1);
    }

    #[test]
    fn arrays_replace_wholesale() {
        let merged = merge_layers([obj(json!({"a": [1, 2]})), obj(json!({"a": [3]}))]);
        assert_eq!(Value::Object(merged), json!({"a": [3]}));
    }

    #[test]
    fn scalar_replaces_object_and_back() {
        let merged = merge_layers([
            obj(json!({"a": {"x": 1}, "b": 5})),
            obj(json!({"a": "flat", "b": {"nested": true}})),
        ]);
        assert_eq!(Value::Object(merged), json!({"a": "flat", "b": {"nested": true}}));
    }

    #[test]
    fn empty_layer_changes_nothing() {
        let merged = merge_layers([obj(json!({"a": 1})), Map::new()]);
        assert_eq!(Value::Object(merged), json!({"a": 1}));
    }
}
