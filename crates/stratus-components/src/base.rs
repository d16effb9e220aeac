//! State and helpers shared by every built-in component.

use std::sync::Arc;

use stratus_core::component::SynthesisState;
use stratus_core::config::ConfigBuilder;
use stratus_core::context::ComponentContext;
use stratus_core::governance::{GovernanceMetadata, GovernanceService, LayeredGovernance};
use stratus_core::spec::ComponentSpec;

/// Spec, context, and synthesis state of a built-in component.
#[derive(Debug)]
pub struct ComponentBase {
    /// Declarative spec.
    pub spec: ComponentSpec,
    /// Shared service context.
    pub context: Arc<ComponentContext>,
    /// Synthesis output.
    pub state: SynthesisState,
}

impl ComponentBase {
    /// Creates an unsynthesized base.
    #[must_use]
    pub fn new(spec: &ComponentSpec, context: &Arc<ComponentContext>) -> Self {
        Self {
            spec: spec.clone(),
            context: Arc::clone(context),
            state: SynthesisState::new(),
        }
    }

    /// Configuration builder for this component.
    #[must_use]
    pub fn config(&self) -> ConfigBuilder<'_> {
        ConfigBuilder::new(&self.context, &self.spec)
    }

    /// Governance metadata for this component.
    #[must_use]
    pub fn governance(&self) -> GovernanceMetadata {
        LayeredGovernance.resolve(&self.context, &self.spec)
    }

    /// Physical resource name, prefixed with service and environment.
    #[must_use]
    pub fn physical_name(&self) -> String {
        self.context.resource_name(&self.spec.name)
    }

    /// Logical template identifier: the PascalCase name plus `suffix`.
    #[must_use]
    pub fn logical_id(&self, suffix: &str) -> String {
        let mut id: String = self
            .spec
            .name
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_ascii_uppercase().to_string() + chars.as_str()
                })
            })
            .collect();
        id.push_str(suffix);
        id
    }

    /// Logs the end of a successful synthesis.
    pub fn log_synthesized(&self) {
        tracing::debug!(
            component = %self.spec.name,
            component_type = %self.spec.component_type,
            constructs = self.state.constructs().len(),
            "component synthesized"
        );
    }
}

#[cfg(test)]
mod tests {
    use stratus_common::types::ComplianceFramework;

    use super::*;

    #[test]
    fn logical_id_is_pascal_case() {
        let ctx = Arc::new(ComponentContext::new("svc", "dev", ComplianceFramework::Commercial));
        let base = ComponentBase::new(&ComponentSpec::new("order-events_queue", "sqs-queue"), &ctx);
        assert_eq!(base.logical_id("Queue"), "OrderEventsQueueQueue");
        assert_eq!(base.physical_name(), "svc-dev-order-events_queue");
    }
}
