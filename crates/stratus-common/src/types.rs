//! Domain primitive types used across the Stratus workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StratusError;

/// Regulatory posture governing which component types and hardening rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceFramework {
    /// Unregulated commercial workloads.
    Commercial,
    /// Entry-level regulated tier.
    FedrampModerate,
    /// Top regulated tier.
    FedrampHigh,
}

impl ComplianceFramework {
    /// Every recognized tier, least restrictive first.
    pub const ALL: [Self; 3] = [Self::Commercial, Self::FedrampModerate, Self::FedrampHigh];

    /// Returns the canonical identifier used in manifests and file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::FedrampModerate => "fedramp-moderate",
            Self::FedrampHigh => "fedramp-high",
        }
    }

    /// Returns whether the tier requires compliance hardening.
    #[must_use]
    pub const fn is_regulated(self) -> bool {
        !matches!(self, Self::Commercial)
    }

    /// Returns the canonical identifiers of every recognized tier.
    #[must_use]
    pub fn supported() -> Vec<String> {
        Self::ALL.iter().map(|f| f.as_str().to_string()).collect()
    }
}

impl FromStr for ComplianceFramework {
    type Err = StratusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| StratusError::UnsupportedFramework {
                framework: s.to_string(),
                supported: Self::supported(),
            })
    }
}

impl fmt::Display for ComplianceFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access level requested by a binding directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum AccessLevel {
    /// Read-only data-plane access.
    Read,
    /// Write-only data-plane access.
    Write,
    /// Read and write data-plane access.
    ReadWrite,
    /// Data-plane access plus management-plane operations.
    Admin,
}

impl AccessLevel {
    /// Every recognized access level, least privileged first.
    pub const ALL: [Self; 4] = [Self::Read, Self::Write, Self::ReadWrite, Self::Admin];

    /// Returns the manifest spelling of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::ReadWrite => "readwrite",
            Self::Admin => "admin",
        }
    }

    /// Returns whether this level grants read operations.
    #[must_use]
    pub const fn reads(self) -> bool {
        !matches!(self, Self::Write)
    }

    /// Returns whether this level grants write operations.
    #[must_use]
    pub const fn writes(self) -> bool {
        !matches!(self, Self::Read)
    }

    /// Returns whether this level grants management-plane operations.
    #[must_use]
    pub const fn manages(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for AccessLevel {
    type Err = StratusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| StratusError::InvalidAccess {
                value: s.to_string(),
                valid: Self::ALL.iter().map(|a| a.as_str()).collect(),
            })
    }
}

impl TryFrom<String> for AccessLevel {
    type Error = StratusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access level permitted on trigger directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TriggerAccess {
    /// The event source invokes the target.
    Invoke,
    /// The event source publishes to the target.
    Publish,
    /// The target subscribes to the event source.
    Subscribe,
}

impl TriggerAccess {
    /// Every recognized trigger access level.
    pub const ALL: [Self; 3] = [Self::Invoke, Self::Publish, Self::Subscribe];

    /// Returns the manifest spelling of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoke => "invoke",
            Self::Publish => "publish",
            Self::Subscribe => "subscribe",
        }
    }
}

impl FromStr for TriggerAccess {
    type Err = StratusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| StratusError::InvalidAccess {
                value: s.to_string(),
                valid: Self::ALL.iter().map(|a| a.as_str()).collect(),
            })
    }
}

impl TryFrom<String> for TriggerAccess {
    type Error = StratusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TriggerAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identity of a component instance within a synthesis run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId {
    /// Owning service.
    pub service: String,
    /// Component name, unique within the service.
    pub name: String,
}

impl ComponentId {
    /// Creates an identity from its parts.
    #[must_use]
    pub fn new(service: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framework_parses_canonical_names() {
        for framework in ComplianceFramework::ALL {
            let parsed: ComplianceFramework = framework.as_str().parse().expect("parse");
            assert_eq!(parsed, framework);
        }
    }

    #[test]
    fn unknown_framework_lists_supported() {
        let err = "hipaa".parse::<ComplianceFramework>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unsupported compliance framework"), "got: {msg}");
        assert!(msg.contains("fedramp-high"), "got: {msg}");
    }

    #[test]
    fn invalid_access_enumerates_valid_values() {
        let err = "owner".parse::<AccessLevel>().unwrap_err();
        let msg = err.to_string();
        for level in ["read", "write", "readwrite", "admin"] {
            assert!(msg.contains(level), "missing {level} in: {msg}");
        }
    }

    #[test]
    fn access_deserializes_through_validation() {
        let ok: AccessLevel = serde_yaml::from_str("readwrite").expect("valid");
        assert_eq!(ok, AccessLevel::ReadWrite);
        assert!(serde_yaml::from_str::<AccessLevel>("root").is_err());
    }

    #[test]
    fn admin_reads_writes_and_manages() {
        assert!(AccessLevel::Admin.reads());
        assert!(AccessLevel::Admin.writes());
        assert!(AccessLevel::Admin.manages());
        assert!(!AccessLevel::ReadWrite.manages());
        assert!(!AccessLevel::Write.reads());
        assert!(!AccessLevel::Read.writes());
    }

    #[test]
    fn component_id_display() {
        assert_eq!(ComponentId::new("shop", "api").to_string(), "shop/api");
    }
}
