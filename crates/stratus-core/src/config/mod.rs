//! Five-layer configuration precedence engine.
//!
//! Layers, lowest priority first:
//! 1. hardcoded fallback from the component's [`ConfigSchema`],
//! 2. platform defaults for the active compliance tier,
//! 3. environment overlay (extension point, empty),
//! 4. component overrides from the manifest,
//! 5. policy overlay (extension point, empty).
//!
//! The merged map then has its `${env:...}` placeholders resolved.

pub mod interpolate;
pub mod merge;
pub mod platform;

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use stratus_common::error::{Result, StratusError};

use crate::context::ComponentContext;
use crate::spec::ComponentSpec;

use self::interpolate::{EnvSource, ProcessEnv};
use self::platform::PlatformConfig;

/// Resolved configuration of one component.
pub type ResolvedConfig = Map<String, Value>;

/// Identifies a configuration layer in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Component-supplied last-resort defaults.
    HardcodedFallback,
    /// Per-tier platform defaults.
    Platform,
    /// Environment overlay.
    Environment,
    /// Manifest `config` block.
    ComponentOverrides,
    /// Governance-driven overlay.
    PolicyOverrides,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HardcodedFallback => "hardcoded-fallback",
            Self::Platform => "platform",
            Self::Environment => "environment",
            Self::ComponentOverrides => "component-overrides",
            Self::PolicyOverrides => "policy-overrides",
        };
        f.write_str(name)
    }
}

/// What a component contributes to its own configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigSchema {
    /// Hardcoded fallback layer.
    pub fallback: Map<String, Value>,
    /// Top-level keys the merged result must contain.
    pub required: Vec<String>,
}

impl ConfigSchema {
    /// Creates a schema from a fallback object. Non-object values yield an
    /// empty fallback.
    #[must_use]
    pub fn new(fallback: Value) -> Self {
        let fallback = match fallback {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            fallback,
            required: Vec::new(),
        }
    }

    /// Adds required top-level keys.
    #[must_use]
    pub fn require(mut self, keys: &[&str]) -> Self {
        self.required.extend(keys.iter().map(|k| (*k).to_string()));
        self
    }
}

/// Builds the resolved configuration of one component.
pub struct ConfigBuilder<'a> {
    context: &'a ComponentContext,
    spec: &'a ComponentSpec,
    env: &'a dyn EnvSource,
}

impl<'a> ConfigBuilder<'a> {
    /// Creates a builder reading placeholders from the process environment.
    #[must_use]
    pub fn new(context: &'a ComponentContext, spec: &'a ComponentSpec) -> Self {
        Self {
            context,
            spec,
            env: &ProcessEnv,
        }
    }

    /// Replaces the environment placeholders are resolved against.
    #[must_use]
    pub fn with_env(mut self, env: &'a dyn EnvSource) -> Self {
        self.env = env;
        self
    }

    /// Merges all five layers and resolves placeholders.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform configuration for the active tier
    /// is missing or has no entry for the component type, or if a required
    /// key is absent from the result.
    pub fn build(&self, schema: &ConfigSchema) -> Result<ResolvedConfig> {
        let platform = self.platform_layer()?;
        let layers = [
            (ConfigLayer::HardcodedFallback, schema.fallback.clone()),
            (ConfigLayer::Platform, platform),
            (ConfigLayer::Environment, self.environment_layer()),
            (ConfigLayer::ComponentOverrides, self.spec.config.clone()),
            (ConfigLayer::PolicyOverrides, self.policy_layer()),
        ];

        for (layer, values) in &layers {
            tracing::trace!(
                component = %self.spec.name,
                %layer,
                keys = values.len(),
                "configuration layer"
            );
        }

        let mut resolved = merge::merge_layers(layers.into_iter().map(|(_, values)| values));
        for value in resolved.values_mut() {
            interpolate::interpolate_value(value, self.env);
        }

        for key in &schema.required {
            if !resolved.contains_key(key) {
                return Err(StratusError::Config {
                    message: format!(
                        "component \"{}\" of type \"{}\" is missing required configuration key \"{key}\"",
                        self.spec.name, self.spec.component_type
                    ),
                });
            }
        }

        tracing::debug!(
            component = %self.spec.name,
            component_type = %self.spec.component_type,
            keys = resolved.len(),
            "configuration resolved"
        );
        Ok(resolved)
    }

    /// Builds and deserializes the configuration into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if [`build`](Self::build) fails or the merged map
    /// does not match `T`.
    pub fn build_typed<T: DeserializeOwned>(&self, schema: &ConfigSchema) -> Result<T> {
        let resolved = self.build(schema)?;
        serde_json::from_value(Value::Object(resolved)).map_err(|e| StratusError::Config {
            message: format!(
                "component \"{}\" of type \"{}\" has invalid configuration: {e}",
                self.spec.name, self.spec.component_type
            ),
        })
    }

    fn platform_layer(&self) -> Result<Map<String, Value>> {
        PlatformConfig::load(&self.context.config_dir, self.context.compliance_framework)?
            .defaults_for(&self.spec.component_type)
    }

    // Environment-specific overlays are not defined yet.
    fn environment_layer(&self) -> Map<String, Value> {
        tracing::debug!(
            environment = %self.context.environment,
            "environment configuration layer not implemented; using empty layer"
        );
        Map::new()
    }

    // Governance-driven overrides are not defined yet.
    fn policy_layer(&self) -> Map<String, Value> {
        tracing::debug!(
            component = %self.spec.name,
            "policy override layer not implemented; using empty layer"
        );
        Map::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::Path;

    use serde::Deserialize;
    use serde_json::json;
    use stratus_common::types::ComplianceFramework;

    use super::*;

    fn write_platform(dir: &Path, body: &str) {
        std::fs::write(dir.join("commercial.yml"), body).expect("write platform config");
    }

    fn context(dir: &Path) -> ComponentContext {
        ComponentContext::new("svc", "dev", ComplianceFramework::Commercial).with_config_dir(dir)
    }

    fn spec_with(config: Value) -> ComponentSpec {
        let mut spec = ComponentSpec::new("queue", "sqs-queue");
        if let Value::Object(map) = config {
            spec.config = map;
        }
        spec
    }

    #[test]
    fn component_overrides_beat_platform_and_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_platform(
            dir.path(),
            "defaults:\n  sqs-queue:\n    shared: platform\n    platformOnly: p\n",
        );
        let ctx = context(dir.path());
        let spec = spec_with(json!({"shared": "component"}));
        let schema = ConfigSchema::new(json!({"shared": "fallback", "fallbackOnly": "f"}));

        let resolved = ConfigBuilder::new(&ctx, &spec).build(&schema).expect("build");
        assert_eq!(resolved["shared"], "component");
        assert_eq!(resolved["platformOnly"], "p");
        assert_eq!(resolved["fallbackOnly"], "f");
    }

    #[test]
    fn platform_beats_fallback_with_nested_merge() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_platform(
            dir.path(),
            "defaults:\n  sqs-queue:\n    encryption:\n      enabled: true\n",
        );
        let ctx = context(dir.path());
        let spec = ComponentSpec::new("queue", "sqs-queue");
        let schema = ConfigSchema::new(json!({"encryption": {"enabled": false, "keyAlias": "aws/sqs"}}));

        let resolved = ConfigBuilder::new(&ctx, &spec).build(&schema).expect("build");
        assert_eq!(
            Value::Object(resolved),
            json!({"encryption": {"enabled": true, "keyAlias": "aws/sqs"}})
        );
    }

    #[test]
    fn missing_platform_entry_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_platform(dir.path(), "defaults:\n  lambda-api: {}\n");
        let ctx = context(dir.path());
        let spec = ComponentSpec::new("queue", "sqs-queue");

        let err = ConfigBuilder::new(&ctx, &spec)
            .build(&ConfigSchema::default())
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("commercial") && msg.contains("sqs-queue"), "got: {msg}");
    }

    #[test]
    fn missing_platform_file_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = context(dir.path());
        let spec = ComponentSpec::new("queue", "sqs-queue");
        let err = ConfigBuilder::new(&ctx, &spec)
            .build(&ConfigSchema::default())
            .unwrap_err();
        assert!(err.to_string().contains("commercial.yml"));
    }

    #[test]
    fn placeholders_resolve_after_merge() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_platform(
            dir.path(),
            "defaults:\n  sqs-queue:\n    name: \"${env:QUEUE_NAME:fallback-name}\"\n",
        );
        let ctx = context(dir.path());
        let spec = spec_with(json!({"tags": ["${env:TEAM}", "${env:UNSET}"]}));
        let env = BTreeMap::from([("TEAM".to_string(), "payments".to_string())]);

        let resolved = ConfigBuilder::new(&ctx, &spec)
            .with_env(&env)
            .build(&ConfigSchema::default())
            .expect("build");
        assert_eq!(resolved["name"], "fallback-name");
        assert_eq!(resolved["tags"], json!(["payments", "${env:UNSET}"]));
    }

    #[test]
    fn required_key_missing_names_component() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_platform(dir.path(), "defaults:\n  sqs-queue: {}\n");
        let ctx = context(dir.path());
        let spec = ComponentSpec::new("queue", "sqs-queue");
        let schema = ConfigSchema::default().require(&["visibilityTimeoutSeconds"]);

        let err = ConfigBuilder::new(&ctx, &spec).build(&schema).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("queue") && msg.contains("visibilityTimeoutSeconds"), "got: {msg}");
    }

    #[test]
    fn build_typed_deserializes_result() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct QueueConfig {
            visibility_timeout_seconds: u64,
            fifo: bool,
        }

        let dir = tempfile::tempdir().expect("tempdir");
        write_platform(dir.path(), "defaults:\n  sqs-queue:\n    visibilityTimeoutSeconds: 45\n");
        let ctx = context(dir.path());
        let spec = ComponentSpec::new("queue", "sqs-queue");
        let schema = ConfigSchema::new(json!({"visibilityTimeoutSeconds": 30, "fifo": false}));

        let cfg: QueueConfig = ConfigBuilder::new(&ctx, &spec).build_typed(&schema).expect("typed");
        assert_eq!(cfg.visibility_timeout_seconds, 45);
        assert!(!cfg.fifo);
    }
}
