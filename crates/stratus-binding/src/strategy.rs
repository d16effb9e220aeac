//! Binding and trigger strategy contracts and the helpers every concrete
//! strategy shares.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use stratus_common::constants::MAIN_CONSTRUCT;
use stratus_common::error::{Result, StratusError};
use stratus_core::component::Component;
use stratus_core::construct::{Construct, Function};

use crate::compat::{CompatibilityEntry, TriggerCompatibilityEntry};
use crate::context::{BindingContext, TriggerContext};
use crate::result::{BindingErrorDetail, BindingResult, TriggerResult};

/// Wires a source component to a capability of a target component.
pub trait BindingStrategy {
    /// Stable strategy name, reported in outcomes.
    fn name(&self) -> &str;

    /// Static self-description.
    fn compatibility_matrix(&self) -> Vec<CompatibilityEntry>;

    /// Whether this strategy wires `source_type` to `capability`. Pure.
    fn can_handle(&self, source_type: &str, capability: &str) -> bool {
        self.compatibility_matrix()
            .iter()
            .any(|e| e.source_type == source_type && e.capability == capability)
    }

    /// Applies the binding.
    ///
    /// Failures after both `"main"` constructs were found are recovered
    /// into a failed [`BindingResult`]. Options are validated before any
    /// construct is mutated, so a failed binding leaves no grants behind.
    ///
    /// # Errors
    ///
    /// Returns an error only if either component lacks its `"main"`
    /// construct.
    fn bind(&self, context: &BindingContext<'_>) -> Result<BindingResult>;
}

/// Wires an event of a source component to a consuming target.
pub trait TriggerStrategy {
    /// Stable strategy name, reported in outcomes.
    fn name(&self) -> &str;

    /// Static self-description.
    fn compatibility_matrix(&self) -> Vec<TriggerCompatibilityEntry>;

    /// Whether this strategy wires `event_type` from `source_type` to
    /// `target_type`. Pure.
    fn can_handle(&self, source_type: &str, target_type: &str, event_type: &str) -> bool {
        self.compatibility_matrix().iter().any(|e| {
            e.source_type == source_type && e.target_type == target_type && e.event_type == event_type
        })
    }

    /// Applies the trigger.
    ///
    /// # Errors
    ///
    /// Returns an error only if either component lacks its `"main"`
    /// construct.
    fn bind(&self, context: &TriggerContext<'_>) -> Result<TriggerResult>;
}

/// Fetches the `"main"` construct of both endpoints.
///
/// # Errors
///
/// Returns an error naming both components if either handle is absent.
pub fn main_constructs<'a>(
    source: &'a dyn Component,
    target: &'a dyn Component,
) -> Result<(&'a Construct, &'a Construct)> {
    let missing = |component: &dyn Component| StratusError::MissingConstruct {
        handle: MAIN_CONSTRUCT.to_string(),
        missing: component.id().to_string(),
        source_component: source.id().to_string(),
        target_component: target.id().to_string(),
    };
    let source_construct = source.construct(MAIN_CONSTRUCT).ok_or_else(|| missing(source))?;
    let target_construct = target.construct(MAIN_CONSTRUCT).ok_or_else(|| missing(target))?;
    Ok((source_construct, target_construct))
}

/// Runs `wire` and folds any error into a failed [`BindingResult`].
pub fn recover_binding<F>(strategy: &str, context: &BindingContext<'_>, wire: F) -> BindingResult
where
    F: FnOnce() -> Result<BindingResult>,
{
    wire().unwrap_or_else(|err| {
        tracing::warn!(
            strategy,
            source = %context.source.name(),
            target = %context.target.name(),
            capability = %context.directive.capability,
            error = %err,
            "binding failed; recorded in outcome"
        );
        let detail = BindingErrorDetail::capture(
            &err,
            context.source.component_type(),
            context.target.component_type(),
        );
        BindingResult::failure(strategy, detail)
    })
}

/// Runs `wire` and folds any error into a failed [`TriggerResult`].
pub fn recover_trigger<F>(strategy: &str, context: &TriggerContext<'_>, wire: F) -> TriggerResult
where
    F: FnOnce() -> Result<TriggerResult>,
{
    wire().unwrap_or_else(|err| {
        tracing::warn!(
            strategy,
            source = %context.source.name(),
            target = %context.target.name(),
            event_type = %context.directive.event_type,
            error = %err,
            "trigger failed; recorded in outcome"
        );
        let detail = BindingErrorDetail::capture(
            &err,
            context.source.component_type(),
            context.target.component_type(),
        );
        TriggerResult::failure(strategy, detail)
    })
}

/// Returns the construct as a function.
///
/// # Errors
///
/// Returns an error naming `component` if the construct is another kind.
pub fn as_function<'a>(construct: &'a Construct, component: &dyn Component) -> Result<&'a Function> {
    construct.as_function().ok_or_else(|| unexpected_kind(construct, component, "function"))
}

/// Error for a `"main"` construct of the wrong kind.
#[must_use]
pub fn unexpected_kind(construct: &Construct, component: &dyn Component, expected: &str) -> StratusError {
    StratusError::binding(format!(
        "component \"{}\" of type \"{}\" exposes a {} as its main construct, expected a {expected}",
        component.name(),
        component.component_type(),
        construct.kind()
    ))
}

/// Collects environment variables and injects them into the source function.
pub struct EnvWriter<'a> {
    function: &'a Function,
    names: &'a BTreeMap<String, String>,
    values: BTreeMap<String, String>,
}

impl<'a> EnvWriter<'a> {
    /// Starts a writer honouring the directive's custom names.
    #[must_use]
    pub const fn new(function: &'a Function, names: &'a BTreeMap<String, String>) -> Self {
        Self {
            function,
            names,
            values: BTreeMap::new(),
        }
    }

    /// Sets the variable for value kind `kind`, named by the directive or
    /// `default_name`.
    pub fn set(&mut self, kind: &str, default_name: &str, value: impl Into<String>) {
        let name = self.names.get(kind).map_or(default_name, String::as_str);
        let value = value.into();
        self.function.add_environment(name, value.clone());
        let _ = self.values.insert(name.to_string(), value);
    }

    /// Returns the variables set so far.
    #[must_use]
    pub fn finish(self) -> BTreeMap<String, String> {
        self.values
    }
}

/// Reads a boolean option; absent means `false`.
///
/// # Errors
///
/// Returns an error if the key is present with a non-boolean value.
pub fn option_flag(options: &Map<String, Value>, key: &str) -> Result<bool> {
    match options.get(key) {
        None => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(StratusError::binding(format!(
            "option \"{key}\" must be a boolean, got {other}"
        ))),
    }
}

/// Reads an optional unsigned integer option.
///
/// # Errors
///
/// Returns an error if the key is present with a non-integer value.
pub fn option_u64(options: &Map<String, Value>, key: &str) -> Result<Option<u64>> {
    match options.get(key) {
        None => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            StratusError::binding(format!(
                "option \"{key}\" must be a non-negative integer, got {value}"
            ))
        }),
    }
}

/// Reads an optional string option.
///
/// # Errors
///
/// Returns an error if the key is present with a non-string value.
pub fn option_str<'a>(options: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>> {
    match options.get(key) {
        None => Ok(None),
        Some(value) => value.as_str().map(Some).ok_or_else(|| {
            StratusError::binding(format!("option \"{key}\" must be a string, got {value}"))
        }),
    }
}
