//! Per-tier platform configuration documents.
//!
//! One YAML document per compliance tier, looked up as
//! `<config_dir>/<tier>.yml`, with component defaults under
//! `defaults.<componentType>`.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use stratus_common::constants::{PLATFORM_CONFIG_EXTENSION, PLATFORM_DEFAULTS_KEY};
use stratus_common::error::{Result, StratusError};
use stratus_common::types::ComplianceFramework;

/// Loaded platform configuration for one tier.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    framework: ComplianceFramework,
    path: PathBuf,
    defaults: Map<String, Value>,
}

impl PlatformConfig {
    /// Returns the file a tier's configuration is read from.
    #[must_use]
    pub fn path_for(config_dir: &Path, framework: ComplianceFramework) -> PathBuf {
        config_dir.join(format!("{}.{PLATFORM_CONFIG_EXTENSION}", framework.as_str()))
    }

    /// Loads the configuration of `framework` from `config_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error embedding the tier and file path if the file is
    /// missing, unreadable, or not a valid platform document.
    pub fn load(config_dir: &Path, framework: ComplianceFramework) -> Result<Self> {
        let path = Self::path_for(config_dir, framework);
        tracing::debug!(path = %path.display(), %framework, "loading platform configuration");

        let content = std::fs::read_to_string(&path).map_err(|e| StratusError::PlatformConfig {
            framework: framework.to_string(),
            path: path.clone(),
            message: format!("cannot read configuration file: {e}"),
        })?;
        Self::from_yaml_str(framework, path, &content)
    }

    /// Parses a platform document already read into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not YAML or lacks a `defaults` mapping.
    pub fn from_yaml_str(framework: ComplianceFramework, path: PathBuf, content: &str) -> Result<Self> {
        let invalid = |message: String| StratusError::PlatformConfig {
            framework: framework.to_string(),
            path: path.clone(),
            message,
        };

        let document: Value =
            serde_yaml::from_str(content).map_err(|e| invalid(format!("invalid YAML: {e}")))?;
        let defaults = match document.get(PLATFORM_DEFAULTS_KEY) {
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err(invalid(format!("\"{PLATFORM_DEFAULTS_KEY}\" must be a mapping"))),
            None => return Err(invalid(format!("missing top-level \"{PLATFORM_DEFAULTS_KEY}\" key"))),
        };

        Ok(Self {
            framework,
            path,
            defaults,
        })
    }

    /// Returns the tier this configuration belongs to.
    #[must_use]
    pub const fn framework(&self) -> ComplianceFramework {
        self.framework
    }

    /// Returns the file this configuration was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the component types with an entry.
    #[must_use]
    pub fn component_types(&self) -> Vec<&str> {
        self.defaults.keys().map(String::as_str).collect()
    }

    /// Returns the defaults for `component_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no mapping for the type.
    pub fn defaults_for(&self, component_type: &str) -> Result<Map<String, Value>> {
        match self.defaults.get(component_type) {
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(_) => Err(self.error(format!(
                "entry for component type \"{component_type}\" must be a mapping"
            ))),
            None => Err(self.error(format!(
                "no entry for component type \"{component_type}\" (configured types: [{}])",
                self.component_types().join(", ")
            ))),
        }
    }

    fn error(&self, message: String) -> StratusError {
        StratusError::PlatformConfig {
            framework: self.framework.to_string(),
            path: self.path.clone(),
            message,
        }
    }
}
