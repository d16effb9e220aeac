//! Inputs handed to a strategy for one directive.

use stratus_core::component::Component;
use stratus_core::context::ComponentContext;
use stratus_core::spec::{BindingDirective, TriggerDirective};

/// One resolved binding: both endpoints and the directive joining them.
pub struct BindingContext<'a> {
    /// Component declaring the bind, usually compute.
    pub source: &'a dyn Component,
    /// Component providing the capability.
    pub target: &'a dyn Component,
    /// The directive being applied.
    pub directive: &'a BindingDirective,
}

impl<'a> BindingContext<'a> {
    /// Creates a binding context.
    #[must_use]
    pub fn new(
        source: &'a dyn Component,
        target: &'a dyn Component,
        directive: &'a BindingDirective,
    ) -> Self {
        Self {
            source,
            target,
            directive,
        }
    }

    /// Service-wide context, shared by both endpoints.
    #[must_use]
    pub fn context(&self) -> &ComponentContext {
        self.source.context()
    }
}

/// One resolved trigger: the event producer, the consumer, the directive.
pub struct TriggerContext<'a> {
    /// Component emitting the event.
    pub source: &'a dyn Component,
    /// Component receiving the event.
    pub target: &'a dyn Component,
    /// The directive being applied.
    pub directive: &'a TriggerDirective,
}

impl<'a> TriggerContext<'a> {
    /// Creates a trigger context.
    #[must_use]
    pub fn new(
        source: &'a dyn Component,
        target: &'a dyn Component,
        directive: &'a TriggerDirective,
    ) -> Self {
        Self {
            source,
            target,
            directive,
        }
    }

    /// Service-wide context, shared by both endpoints.
    #[must_use]
    pub fn context(&self) -> &ComponentContext {
        self.source.context()
    }
}
