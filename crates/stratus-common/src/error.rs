//! Unified error types for the Stratus workspace.
//!
//! Every fatal condition carries enough identifying context (component,
//! type, tier, file path, available alternatives) for an operator to fix
//! the manifest without reading source.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum StratusError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The platform configuration source for a tier is missing or invalid.
    #[error("platform configuration for framework \"{framework}\" at {}: {message}", .path.display())]
    PlatformConfig {
        /// Compliance framework whose configuration was requested.
        framework: String,
        /// File the configuration was expected in.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// A compliance framework outside the recognized tiers was requested.
    #[error("unsupported compliance framework: \"{framework}\" (supported: {})", .supported.join(", "))]
    UnsupportedFramework {
        /// The requested framework.
        framework: String,
        /// Frameworks the provider knows about.
        supported: Vec<String>,
    },

    /// No creator is registered for a component type.
    #[error(
        "no creator registered for component type \"{component_type}\" (component \"{component}\"); available types: [{}]",
        .available.join(", ")
    )]
    UnknownComponentType {
        /// The requested type key.
        component_type: String,
        /// Name of the component that requested it.
        component: String,
        /// Every type currently registered.
        available: Vec<String>,
    },

    /// A component was queried before `synth()` populated it.
    #[error("component \"{component}\" has not been synthesized")]
    NotSynthesized {
        /// Component name.
        component: String,
    },

    /// A component's `synth()` broke the synthesis contract.
    #[error("component \"{component}\" violated the synthesis contract: {message}")]
    SynthesisContract {
        /// Component name.
        component: String,
        /// Which part of the contract was violated.
        message: String,
    },

    /// A construct handle required for binding is absent.
    #[error(
        "construct handle \"{handle}\" not found on \"{missing}\" while binding \"{source_component}\" -> \"{target_component}\""
    )]
    MissingConstruct {
        /// Handle name that was looked up.
        handle: String,
        /// Component that lacks the handle.
        missing: String,
        /// Source component identity.
        source_component: String,
        /// Target component identity.
        target_component: String,
    },

    /// A component type has no security group registered for a role.
    #[error("component \"{component}\" of type \"{component_type}\" has no security group handle for role \"{role}\"")]
    MissingSecurityGroup {
        /// Component name.
        component: String,
        /// Component type.
        component_type: String,
        /// Requested role.
        role: String,
    },

    /// A binding or trigger directive is malformed.
    #[error("invalid directive on component \"{component}\": {message}")]
    InvalidDirective {
        /// Component declaring the directive.
        component: String,
        /// Description of the problem.
        message: String,
    },

    /// A target selector matched zero or several components.
    #[error("target selection failed for component \"{component}\": {message}")]
    Selector {
        /// Component declaring the directive.
        component: String,
        /// Description of the mismatch.
        message: String,
    },

    /// An access level outside the recognized values.
    #[error("invalid access level \"{value}\"; valid values: {}", .valid.join(", "))]
    InvalidAccess {
        /// The rejected value.
        value: String,
        /// Accepted values.
        valid: Vec<&'static str>,
    },

    /// No registered strategy handles a directive.
    #[error("no strategy supports {source_type} -> {target_type} for \"{requested}\"")]
    UnsupportedBinding {
        /// Type of the declaring component.
        source_type: String,
        /// Type of the resolved target.
        target_type: String,
        /// Requested capability or event type.
        requested: String,
    },

    /// A strategy failed while wiring an already-resolved binding.
    #[error("binding failed: {message}")]
    Binding {
        /// Description of the failure.
        message: String,
    },

    /// An escape-hatch patch module failed.
    #[error("patch module \"{module}\" failed: {message}")]
    Patch {
        /// Patch module name.
        module: String,
        /// Description of the failure.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl StratusError {
    /// Short machine-readable name of the error variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "Io",
            Self::Config { .. } => "Config",
            Self::PlatformConfig { .. } => "PlatformConfig",
            Self::UnsupportedFramework { .. } => "UnsupportedFramework",
            Self::UnknownComponentType { .. } => "UnknownComponentType",
            Self::NotSynthesized { .. } => "NotSynthesized",
            Self::SynthesisContract { .. } => "SynthesisContract",
            Self::MissingConstruct { .. } => "MissingConstruct",
            Self::MissingSecurityGroup { .. } => "MissingSecurityGroup",
            Self::InvalidDirective { .. } => "InvalidDirective",
            Self::Selector { .. } => "Selector",
            Self::InvalidAccess { .. } => "InvalidAccess",
            Self::UnsupportedBinding { .. } => "UnsupportedBinding",
            Self::Binding { .. } => "Binding",
            Self::Patch { .. } => "Patch",
            Self::NotFound { .. } => "NotFound",
            Self::Serialization { .. } => "Serialization",
        }
    }

    /// Shorthand for a recovered strategy failure.
    #[must_use]
    pub fn binding(message: impl Into<String>) -> Self {
        Self::Binding {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, StratusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_lists_available_types() {
        let err = StratusError::UnknownComponentType {
            component_type: "kafka".into(),
            component: "events".into(),
            available: vec!["a".into(), "b".into(), "c".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("\"kafka\""), "got: {msg}");
        assert!(msg.contains("[a, b, c]"), "got: {msg}");
    }

    #[test]
    fn platform_config_embeds_framework_and_path() {
        let err = StratusError::PlatformConfig {
            framework: "fedramp-high".into(),
            path: PathBuf::from("/etc/stratus/fedramp-high.yml"),
            message: "file not found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("fedramp-high"));
        assert!(msg.contains("/etc/stratus/fedramp-high.yml"));
    }

    #[test]
    fn kind_names_the_variant() {
        assert_eq!(StratusError::binding("boom").kind(), "Binding");
    }
}
