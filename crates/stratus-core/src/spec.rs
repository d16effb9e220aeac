//! Declarative manifest model.
//!
//! These types are produced by the manifest loader and are read-only to
//! the engine. Field names follow the camelCase manifest spelling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use stratus_common::error::{Result, StratusError};
use stratus_common::types::{AccessLevel, TriggerAccess};

use crate::context::{GovernanceConfig, ObservabilityConfig, SecurityConfig};

/// Root of a service manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Service name, used as the identity prefix of every component.
    pub service: String,
    /// Owning team.
    #[serde(default)]
    pub owner: Option<String>,
    /// Compliance framework identifier (validated by the factory provider).
    #[serde(default = "default_framework")]
    pub compliance_framework: String,
    /// Deployment environment name.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Deployment region.
    #[serde(default)]
    pub region: Option<String>,
    /// Deployment account.
    #[serde(default)]
    pub account_id: Option<String>,
    /// Service-wide labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Governance settings.
    #[serde(default)]
    pub governance: GovernanceConfig,
    /// Security settings.
    #[serde(default)]
    pub security: SecurityConfig,
    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Components in declaration order.
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

fn default_framework() -> String {
    "commercial".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

/// Declarative description of a single component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    /// Component name, unique within the service.
    pub name: String,
    /// Registry key selecting the creator.
    #[serde(rename = "type")]
    pub component_type: String,
    /// Component-level configuration overrides.
    #[serde(default)]
    pub config: Map<String, Value>,
    /// Outbound binding directives.
    #[serde(default)]
    pub binds: Vec<BindingDirective>,
    /// Event trigger directives.
    #[serde(default)]
    pub triggers: Vec<TriggerDirective>,
    /// Labels used by selectors and governance.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Escape-hatch property overrides.
    #[serde(default)]
    pub overrides: Map<String, Value>,
    /// Explicit governance policy.
    #[serde(default)]
    pub policy: Map<String, Value>,
}

impl ComponentSpec {
    /// Creates a spec with a name and type and nothing else.
    #[must_use]
    pub fn new(name: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            component_type: component_type.into(),
            ..Self::default()
        }
    }
}

/// Type and label based target selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorSpec {
    /// Required component type.
    #[serde(rename = "type")]
    pub component_type: String,
    /// Labels the target must carry (all of them).
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

/// How a directive identifies its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelector<'a> {
    /// Direct reference by component name.
    Named(&'a str),
    /// Type plus labels; must match exactly one component.
    Select(&'a SelectorSpec),
}

impl std::fmt::Display for TargetSelector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "to: {name}"),
            Self::Select(sel) => {
                write!(f, "select: type={}", sel.component_type)?;
                for (k, v) in &sel.labels {
                    write!(f, " {k}={v}")?;
                }
                Ok(())
            }
        }
    }
}

/// One outbound edge from a component to a target capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingDirective {
    /// Target by name.
    #[serde(default)]
    pub to: Option<String>,
    /// Target by type and labels.
    #[serde(default)]
    pub select: Option<SelectorSpec>,
    /// Capability key on the target, e.g. `queue:sqs`.
    pub capability: String,
    /// Requested access level.
    pub access: AccessLevel,
    /// Custom environment variable names, keyed by value kind.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Strategy-specific options.
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl BindingDirective {
    /// Creates a name-targeted directive with no env mapping or options.
    #[must_use]
    pub fn to(target: impl Into<String>, capability: impl Into<String>, access: AccessLevel) -> Self {
        Self {
            to: Some(target.into()),
            select: None,
            capability: capability.into(),
            access,
            env: BTreeMap::new(),
            options: Map::new(),
        }
    }

    /// Returns the validated target selector.
    ///
    /// # Errors
    ///
    /// Returns an error if neither or both of `to` and `select` are set.
    pub fn target(&self, component: &str) -> Result<TargetSelector<'_>> {
        select_target(self.to.as_deref(), self.select.as_ref(), component, "bind")
    }
}

/// One event-driven edge from a resource event to a target component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDirective {
    /// Event name, e.g. `object:created`.
    pub event_type: String,
    /// Target by name.
    #[serde(default)]
    pub to: Option<String>,
    /// Target by type and labels.
    #[serde(default)]
    pub select: Option<SelectorSpec>,
    /// Requested trigger access.
    pub access: TriggerAccess,
    /// Event filter, shape defined by the strategy.
    #[serde(default)]
    pub filter: Option<Value>,
    /// Input transformation, passed through to the trigger configuration.
    #[serde(default)]
    pub transform: Option<Value>,
    /// Retry, dead-letter and batching options.
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl TriggerDirective {
    /// Creates a name-targeted trigger with no filter or options.
    #[must_use]
    pub fn to(target: impl Into<String>, event_type: impl Into<String>, access: TriggerAccess) -> Self {
        Self {
            event_type: event_type.into(),
            to: Some(target.into()),
            select: None,
            access,
            filter: None,
            transform: None,
            options: Map::new(),
        }
    }

    /// Returns the validated target selector.
    ///
    /// # Errors
    ///
    /// Returns an error if neither or both of `to` and `select` are set.
    pub fn target(&self, component: &str) -> Result<TargetSelector<'_>> {
        select_target(self.to.as_deref(), self.select.as_ref(), component, "trigger")
    }
}

fn select_target<'a>(
    to: Option<&'a str>,
    select: Option<&'a SelectorSpec>,
    component: &str,
    what: &str,
) -> Result<TargetSelector<'a>> {
    match (to, select) {
        (Some(name), None) => Ok(TargetSelector::Named(name)),
        (None, Some(sel)) => Ok(TargetSelector::Select(sel)),
        (Some(_), Some(_)) => Err(StratusError::InvalidDirective {
            component: component.to_string(),
            message: format!("{what} declares both \"to\" and \"select\"; exactly one is allowed"),
        }),
        (None, None) => Err(StratusError::InvalidDirective {
            component: component.to_string(),
            message: format!("{what} declares neither \"to\" nor \"select\""),
        }),
    }
}
