//! `${env:KEY}` and `${env:KEY:default}` placeholder resolution.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

const OPEN: &str = "${env:";

/// Source of runtime environment variables.
pub trait EnvSource {
    /// Returns the value of `key`, if set.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Resolves placeholders in every string of `value`, recursing through
/// objects and arrays alike.
pub fn interpolate_value(value: &mut Value, env: &dyn EnvSource) {
    match value {
        Value::String(s) => {
            if s.contains(OPEN) {
                *s = interpolate_str(s, env);
            }
        }
        Value::Array(items) => {
            for item in items {
                interpolate_value(item, env);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                interpolate_value(item, env);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Resolves placeholders in a single string.
///
/// A placeholder resolves to the variable, else its default, else it is
/// left exactly as written.
#[must_use]
pub fn interpolate_str(input: &str, env: &dyn EnvSource) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let body = &after[..end];
        let (key, default) = match body.split_once(':') {
            Some((key, default)) => (key, Some(default)),
            None => (body, None),
        };
        match env.var(key).or_else(|| default.map(str::to_string)) {
            Some(resolved) => out.push_str(&resolved),
            None => out.push_str(&rest[start..start + OPEN.len() + end + 1]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn env() -> BTreeMap<String, String> {
        BTreeMap::from([("FOO".to_string(), "bar".to_string())])
    }

    #[test]
    fn set_variable_resolves() {
        assert_eq!(interpolate_str("${env:FOO}", &env()), "bar");
    }

    #[test]
    fn missing_variable_uses_default() {
        assert_eq!(interpolate_str("${env:MISSING:default}", &env()), "default");
    }

    #[test]
    fn missing_variable_without_default_is_left_verbatim() {
        assert_eq!(interpolate_str("${env:MISSING}", &env()), "${env:MISSING}");
    }

    #[test]
    fn default_may_contain_colons() {
        assert_eq!(
            interpolate_str("${env:URL:http://localhost:8080}", &env()),
            "http://localhost:8080"
        );
    }

    #[test]
    fn surrounding_text_and_multiple_placeholders() {
        assert_eq!(
            interpolate_str("a-${env:FOO}-${env:NOPE:x}-${env:NOPE}-z", &env()),
            "a-bar-x-${env:NOPE}-z"
        );
    }

    #[test]
    fn unterminated_placeholder_is_kept() {
        assert_eq!(interpolate_str("x ${env:FOO", &env()), "x ${env:FOO");
    }

    #[test]
    fn recursion_covers_arrays_of_objects() {
        let mut value = json!({
            "list": ["${env:FOO}", {"deep": ["${env:NOPE:d}"]}],
            "n": 1
        });
        interpolate_value(&mut value, &env());
        assert_eq!(value, json!({"list": ["bar", {"deep": ["d"]}], "n": 1}));
    }
}
