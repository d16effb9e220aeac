//! The component contract.
//!
//! Every component variant implements [`Component`]. The shared
//! [`SynthesisState`] holds the two maps `synth()` writes once: named
//! construct handles and named capabilities.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use stratus_common::error::{Result, StratusError};
use stratus_common::types::ComponentId;

use crate::construct::{Construct, SecurityGroup};
use crate::context::ComponentContext;
use crate::spec::ComponentSpec;

/// Capability key to capability data.
pub type CapabilityMap = BTreeMap<String, Value>;

/// Handle prefix under which security groups are registered.
pub const SECURITY_GROUP_HANDLE_PREFIX: &str = "securityGroup:";

/// Write-once synthesis output of a component.
#[derive(Debug, Default)]
pub struct SynthesisState {
    constructs: BTreeMap<String, Construct>,
    capabilities: CapabilityMap,
}

impl SynthesisState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether both maps have been populated.
    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        !self.constructs.is_empty() && !self.capabilities.is_empty()
    }

    /// Registers a construct under `handle`.
    pub fn register_construct(&mut self, handle: impl Into<String>, construct: Construct) {
        let _ = self.constructs.insert(handle.into(), construct);
    }

    /// Registers a security group under the handle for `role`.
    pub fn register_security_group(&mut self, role: &str, group: SecurityGroup) {
        self.register_construct(
            format!("{SECURITY_GROUP_HANDLE_PREFIX}{role}"),
            Construct::SecurityGroup(group),
        );
    }

    /// Registers capability data under `key`.
    pub fn register_capability(&mut self, key: impl Into<String>, data: Value) {
        let _ = self.capabilities.insert(key.into(), data);
    }

    /// Returns the construct registered under `handle`.
    #[must_use]
    pub fn construct(&self, handle: &str) -> Option<&Construct> {
        self.constructs.get(handle)
    }

    /// Returns every registered construct.
    #[must_use]
    pub const fn constructs(&self) -> &BTreeMap<String, Construct> {
        &self.constructs
    }

    /// Returns the capability map.
    ///
    /// # Errors
    ///
    /// Returns an error if the component has not been synthesized.
    pub fn capabilities(&self, component: &str) -> Result<&CapabilityMap> {
        if self.capabilities.is_empty() {
            return Err(StratusError::NotSynthesized {
                component: component.to_string(),
            });
        }
        Ok(&self.capabilities)
    }

    /// Checks that `synth()` populated both maps.
    ///
    /// # Errors
    ///
    /// Returns an error naming the empty map.
    pub fn validate_synthesized(&self, component: &str) -> Result<()> {
        let missing = match (self.constructs.is_empty(), self.capabilities.is_empty()) {
            (false, false) => return Ok(()),
            (true, true) => "no constructs and no capabilities",
            (true, false) => "no constructs",
            (false, true) => "no capabilities",
        };
        Err(StratusError::SynthesisContract {
            component: component.to_string(),
            message: format!("synth() registered {missing}"),
        })
    }
}

/// Serializable description of a synthesized component.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummary {
    /// Component identity.
    pub id: ComponentId,
    /// Component type.
    pub component_type: String,
    /// Capability map.
    pub capabilities: CapabilityMap,
    /// Construct handles and their resources.
    pub constructs: BTreeMap<String, Construct>,
}

/// A unit of infrastructure description.
///
/// Implementors own a [`SynthesisState`] and expose it through
/// [`Component::state`]; everything else has a default built on it.
pub trait Component {
    /// The declarative spec this component was created from.
    fn spec(&self) -> &ComponentSpec;

    /// The service-wide context.
    fn context(&self) -> &ComponentContext;

    /// Synthesis output.
    fn state(&self) -> &SynthesisState;

    /// Populates constructs and capabilities.
    ///
    /// Must be idempotent: calling it on an already-synthesized component
    /// returns without side effects.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be resolved or the
    /// component breaks the synthesis contract.
    fn synth(&mut self) -> Result<()>;

    /// Component type key.
    fn component_type(&self) -> &str {
        &self.spec().component_type
    }

    /// Component name.
    fn name(&self) -> &str {
        &self.spec().name
    }

    /// Component identity within the run.
    fn id(&self) -> ComponentId {
        ComponentId::new(&self.context().service_name, self.name())
    }

    /// Capabilities exposed after synthesis.
    ///
    /// # Errors
    ///
    /// Returns an error if called before `synth()`.
    fn capabilities(&self) -> Result<&CapabilityMap> {
        self.state().capabilities(self.name())
    }

    /// Construct registered under `handle`.
    fn construct(&self, handle: &str) -> Option<&Construct> {
        self.state().construct(handle)
    }

    /// Security group registered for `role`.
    ///
    /// # Errors
    ///
    /// Returns an error if the component has no security group for `role`.
    fn security_group_handle(&self, role: &str) -> Result<&SecurityGroup> {
        self.construct(&format!("{SECURITY_GROUP_HANDLE_PREFIX}{role}"))
            .and_then(Construct::as_security_group)
            .ok_or_else(|| StratusError::MissingSecurityGroup {
                component: self.name().to_string(),
                component_type: self.component_type().to_string(),
                role: role.to_string(),
            })
    }

    /// Serializable snapshot of the synthesized component.
    ///
    /// # Errors
    ///
    /// Returns an error if called before `synth()`.
    fn summary(&self) -> Result<ComponentSummary> {
        Ok(ComponentSummary {
            id: self.id(),
            component_type: self.component_type().to_string(),
            capabilities: self.capabilities()?.clone(),
            constructs: self.state().constructs().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use stratus_common::types::ComplianceFramework;

    use super::*;
    use crate::construct::Topic;

    struct Probe {
        spec: ComponentSpec,
        context: ComponentContext,
        state: SynthesisState,
        synth_calls: usize,
    }

    impl Probe {
        fn new() -> Self {
            Self {
                spec: ComponentSpec::new("events", "sns-topic"),
                context: ComponentContext::new("svc", "dev", ComplianceFramework::Commercial),
                state: SynthesisState::new(),
                synth_calls: 0,
            }
        }
    }

    impl Component for Probe {
        fn spec(&self) -> &ComponentSpec {
            &self.spec
        }

        fn context(&self) -> &ComponentContext {
            &self.context
        }

        fn state(&self) -> &SynthesisState {
            &self.state
        }

        fn synth(&mut self) -> Result<()> {
            if self.state.is_synthesized() {
                return Ok(());
            }
            self.synth_calls += 1;
            self.state.register_construct(
                "main",
                Construct::Topic(Topic::new("Events", "svc-dev-events", "arn:aws:sns:::events")),
            );
            self.state.register_capability("topic:sns", serde_json::json!({"topicArn": "arn"}));
            self.state.validate_synthesized(self.name())
        }
    }

    #[test]
    fn capabilities_before_synth_fail() {
        let probe = Probe::new();
        let err = probe.capabilities().unwrap_err();
        assert!(err.to_string().contains("not been synthesized"));
    }

    #[test]
    fn synth_is_idempotent() {
        let mut probe = Probe::new();
        probe.synth().expect("first");
        probe.synth().expect("second");
        assert_eq!(probe.synth_calls, 1);
        assert!(probe.capabilities().expect("caps").contains_key("topic:sns"));
    }

    #[test]
    fn validate_names_the_empty_map() {
        let mut state = SynthesisState::new();
        state.register_capability("x", Value::Null);
        let err = state.validate_synthesized("c").unwrap_err();
        assert!(err.to_string().contains("no constructs"), "got: {err}");
    }

    #[test]
    fn missing_security_group_is_descriptive() {
        let mut probe = Probe::new();
        probe.synth().expect("synth");
        let err = probe.security_group_handle("database").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("events") && msg.contains("sns-topic") && msg.contains("database"));
    }

    #[test]
    fn summary_snapshots_constructs() {
        let mut probe = Probe::new();
        probe.synth().expect("synth");
        let summary = probe.summary().expect("summary");
        assert_eq!(summary.id.to_string(), "svc/events");
        assert!(summary.constructs.contains_key("main"));
    }
}
