//! Escape-hatch patch modules.
//!
//! Patches run after every binding has been applied. They see the
//! construct handles of every component but cannot add or remove handles;
//! changes go through the constructs' own mutators.

use std::collections::BTreeMap;

use stratus_common::error::Result;
use stratus_core::component::Component;
use stratus_core::construct::Construct;
use stratus_core::context::ComponentContext;

/// Read-only view of all synthesized components' construct handles.
pub struct ConstructView<'a> {
    context: &'a ComponentContext,
    components: &'a [Box<dyn Component>],
}

impl<'a> ConstructView<'a> {
    /// Creates a view over `components`.
    #[must_use]
    pub const fn new(context: &'a ComponentContext, components: &'a [Box<dyn Component>]) -> Self {
        Self { context, components }
    }

    /// Service-wide context of the run.
    #[must_use]
    pub const fn context(&self) -> &ComponentContext {
        self.context
    }

    /// Component names, in declaration order.
    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.name())
    }

    /// Type of the component called `component`.
    #[must_use]
    pub fn component_type(&self, component: &str) -> Option<&str> {
        self.find(component).map(|c| c.component_type())
    }

    /// Every handle of `component`.
    #[must_use]
    pub fn constructs(&self, component: &str) -> Option<&BTreeMap<String, Construct>> {
        self.find(component).map(|c| c.state().constructs())
    }

    /// One handle of `component`.
    #[must_use]
    pub fn construct(&self, component: &str, handle: &str) -> Option<&Construct> {
        self.find(component).and_then(|c| c.construct(handle))
    }

    fn find(&self, component: &str) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|c| c.name() == component)
            .map(|c| &**c)
    }
}

/// Custom post-binding adjustments.
pub trait PatchModule {
    /// Name reported in logs, errors and the synthesis result.
    fn name(&self) -> &str;

    /// Applies the patch.
    ///
    /// # Errors
    ///
    /// Any error aborts the synthesis run.
    fn apply(&self, view: &ConstructView<'_>) -> Result<()>;
}

/// Sets fixed environment variables on every function of the run.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentPatch {
    variables: BTreeMap<String, String>,
}

impl EnvironmentPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.variables.insert(key.into(), value.into());
        self
    }
}

impl PatchModule for EnvironmentPatch {
    fn name(&self) -> &str {
        "environment"
    }

    fn apply(&self, view: &ConstructView<'_>) -> Result<()> {
        for component in view.component_names() {
            let functions = view
                .constructs(component)
                .into_iter()
                .flat_map(BTreeMap::values)
                .filter_map(Construct::as_function);
            for function in functions {
                for (key, value) in &self.variables {
                    function.add_environment(key, value);
                }
                tracing::debug!(component, function = %function.function_name, "environment patch applied");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use stratus_common::types::ComplianceFramework;
    use stratus_core::component::SynthesisState;
    use stratus_core::construct::{Function, Queue, Role};
    use stratus_core::spec::ComponentSpec;

    use super::*;

    struct Built {
        spec: ComponentSpec,
        context: ComponentContext,
        state: SynthesisState,
    }

    impl Component for Built {
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
            Ok(())
        }
    }

    fn built(name: &str, component_type: &str, construct: Construct) -> Box<dyn Component> {
        let mut state = SynthesisState::new();
        state.register_construct("main", construct);
        Box::new(Built {
            spec: ComponentSpec::new(name, component_type),
            context: ComponentContext::new("svc", "dev", ComplianceFramework::Commercial),
            state,
        })
    }

    fn components() -> Vec<Box<dyn Component>> {
        vec![
            built(
                "api",
                "lambda-api",
                Construct::Function(Function::new("ApiFn", "svc-dev-api", "arn:fn", Role::new("arn:role"))),
            ),
            built(
                "jobs",
                "sqs-queue",
                Construct::Queue(Queue::new("JobsQueue", "svc-dev-jobs", "arn:q", "https://q")),
            ),
        ]
    }

    #[test]
    fn view_exposes_handles_by_component() {
        let context = ComponentContext::new("svc", "dev", ComplianceFramework::Commercial);
        let all = components();
        let view = ConstructView::new(&context, &all);
        assert_eq!(view.component_names().collect::<Vec<_>>(), vec!["api", "jobs"]);
        assert_eq!(view.component_type("jobs"), Some("sqs-queue"));
        assert_eq!(view.construct("jobs", "main").map(Construct::kind), Some("queue"));
        assert!(view.constructs("missing").is_none());
    }

    #[test]
    fn environment_patch_reaches_every_function() {
        let context = ComponentContext::new("svc", "dev", ComplianceFramework::Commercial);
        let all = components();
        let view = ConstructView::new(&context, &all);
        EnvironmentPatch::new()
            .with("LOG_LEVEL", "debug")
            .apply(&view)
            .expect("apply");
        let function = view
            .construct("api", "main")
            .and_then(Construct::as_function)
            .expect("function");
        assert_eq!(function.environment().get("LOG_LEVEL").map(String::as_str), Some("debug"));
    }
}
