//! Declarative compatibility advertisements.

use serde::Serialize;
use stratus_common::types::{AccessLevel, TriggerAccess};

/// A `(source, target, capability)` combination a binding strategy handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityEntry {
    /// Component type declaring the bind.
    pub source_type: String,
    /// Component type providing the capability.
    pub target_type: String,
    /// Capability key.
    pub capability: String,
    /// Access levels the strategy can grant.
    pub supported_access: Vec<AccessLevel>,
    /// Human-readable summary.
    pub description: String,
}

impl CompatibilityEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(
        source_type: &str,
        target_type: &str,
        capability: &str,
        supported_access: &[AccessLevel],
        description: impl Into<String>,
    ) -> Self {
        Self {
            source_type: source_type.to_string(),
            target_type: target_type.to_string(),
            capability: capability.to_string(),
            supported_access: supported_access.to_vec(),
            description: description.into(),
        }
    }

    /// Returns whether `access` is advertised.
    #[must_use]
    pub fn supports(&self, access: AccessLevel) -> bool {
        self.supported_access.contains(&access)
    }
}

/// A `(source, target, event)` combination a trigger strategy handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCompatibilityEntry {
    /// Component type emitting the event.
    pub source_type: String,
    /// Component type consuming the event.
    pub target_type: String,
    /// Event name.
    pub event_type: String,
    /// Trigger access kinds the strategy supports.
    pub supported_access: Vec<TriggerAccess>,
    /// Human-readable summary.
    pub description: String,
}

impl TriggerCompatibilityEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(
        source_type: &str,
        target_type: &str,
        event_type: &str,
        supported_access: &[TriggerAccess],
        description: impl Into<String>,
    ) -> Self {
        Self {
            source_type: source_type.to_string(),
            target_type: target_type.to_string(),
            event_type: event_type.to_string(),
            supported_access: supported_access.to_vec(),
            description: description.into(),
        }
    }

    /// Returns whether `access` is advertised.
    #[must_use]
    pub fn supports(&self, access: TriggerAccess) -> bool {
        self.supported_access.contains(&access)
    }
}
