//! The synthesis orchestrator.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use stratus_binding::context::{BindingContext, TriggerContext};
use stratus_binding::matrix::BinderMatrix;
use stratus_binding::result::{BindingErrorDetail, BindingResult, TriggerResult};
use stratus_common::error::{Result, StratusError};
use stratus_common::types::ComplianceFramework;
use stratus_components::factory::ComponentFactoryProvider;
use stratus_core::component::{Component, ComponentSummary};
use stratus_core::context::ComponentContext;
use stratus_core::registry::ComponentRegistry;
use stratus_core::spec::{BindingDirective, ComponentSpec, TriggerDirective};
use stratus_core::validator;
use uuid::Uuid;

use crate::patches::{ConstructView, PatchModule};
use crate::result::{self, BindingOutcome, SynthesisResult, TriggerOutcome};
use crate::selector;

/// Strategy name recorded on outcomes that had no matching strategy.
pub const NO_STRATEGY: &str = "none";

/// Runs the five synthesis phases over a service's components.
///
/// The engine owns the component registry of one compliance tier and an
/// explicitly constructed [`BinderMatrix`]. It is synchronous; every phase
/// completes before the next starts, and declaration order is preserved
/// within each phase.
pub struct ResolverEngine {
    framework: Option<ComplianceFramework>,
    registry: ComponentRegistry,
    matrix: BinderMatrix,
    patches: Vec<Box<dyn PatchModule>>,
}

impl ResolverEngine {
    /// Creates an engine from an explicit registry and matrix.
    #[must_use]
    pub fn new(registry: ComponentRegistry, matrix: BinderMatrix) -> Self {
        Self {
            framework: None,
            registry,
            matrix,
            patches: Vec::new(),
        }
    }

    /// Creates an engine with the tier's built-in components and every
    /// built-in strategy. Contexts of another tier are rejected by
    /// [`synthesize`](Self::synthesize).
    ///
    /// # Errors
    ///
    /// Returns an error if the tier has no factory.
    pub fn for_framework(framework: ComplianceFramework) -> Result<Self> {
        let factory = ComponentFactoryProvider::for_framework(framework)?;
        Ok(Self {
            framework: Some(framework),
            registry: factory.create_registry(),
            matrix: BinderMatrix::with_default_strategies(),
            patches: Vec::new(),
        })
    }

    /// Appends a patch module; modules run in the order added.
    #[must_use]
    pub fn with_patch_module(mut self, module: Box<dyn PatchModule>) -> Self {
        self.patches.push(module);
        self
    }

    /// The strategy matrix used for binding.
    #[must_use]
    pub const fn matrix(&self) -> &BinderMatrix {
        &self.matrix
    }

    /// The component registry used for instantiation.
    #[must_use]
    pub const fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Synthesizes `specs` within `context`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: invalid specs, unknown component
    /// type, configuration failure, synthesis contract violation, target
    /// selection failure, missing construct handle or patch failure.
    /// Strategy-internal failures and directives without a strategy are
    /// recorded in the result instead.
    pub fn synthesize(&self, context: &Arc<ComponentContext>, specs: &[ComponentSpec]) -> Result<SynthesisResult> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let run_id = Uuid::new_v4();
        tracing::info!(
            %run_id,
            service = %context.service_name,
            framework = %context.compliance_framework,
            components = specs.len(),
            "synthesis started"
        );

        self.check_framework(context)?;
        validator::validate_components(specs)?;

        let mut components = self.instantiate(context, specs)?;
        Self::synth_all(&mut components)?;
        let bindings = self.bind_all(&components)?;
        let triggers = self.trigger_all(&components)?;
        let patch_modules = self.patch_all(context, &components)?;

        let summaries = components
            .iter()
            .map(|c| c.summary())
            .collect::<Result<Vec<ComponentSummary>>>()?;
        let fingerprint = result::fingerprint(&summaries, &bindings, &triggers)?;
        let duration_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);

        let report = SynthesisResult {
            run_id,
            service: context.service_name.clone(),
            environment: context.environment.clone(),
            compliance_framework: context.compliance_framework,
            started_at,
            duration_ms,
            components: summaries,
            bindings,
            triggers,
            patches_applied: !patch_modules.is_empty(),
            patch_modules,
            fingerprint,
        };
        tracing::info!(
            %run_id,
            bindings = report.bindings.len(),
            triggers = report.triggers.len(),
            failures = report.failure_count(),
            duration_ms,
            fingerprint = %report.fingerprint,
            "synthesis completed"
        );
        Ok(report)
    }

    fn check_framework(&self, context: &ComponentContext) -> Result<()> {
        match self.framework {
            Some(framework) if framework != context.compliance_framework => Err(StratusError::Config {
                message: format!(
                    "engine was built for framework \"{framework}\" but the context requests \"{}\"",
                    context.compliance_framework
                ),
            }),
            _ => Ok(()),
        }
    }

    // Phase 1.
    fn instantiate(&self, context: &Arc<ComponentContext>, specs: &[ComponentSpec]) -> Result<Vec<Box<dyn Component>>> {
        let components = specs
            .iter()
            .map(|spec| self.registry.create_component(spec, context))
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(count = components.len(), "components instantiated");
        Ok(components)
    }

    // Phase 2.
    fn synth_all(components: &mut [Box<dyn Component>]) -> Result<()> {
        for component in components.iter_mut() {
            component.synth()?;
            tracing::debug!(
                component = %component.name(),
                component_type = %component.component_type(),
                "component synthesized"
            );
        }
        tracing::info!(count = components.len(), "components synthesized");
        Ok(())
    }

    // Phase 3, binds.
    fn bind_all(&self, components: &[Box<dyn Component>]) -> Result<Vec<BindingOutcome>> {
        let mut outcomes = Vec::new();
        for source in components {
            for directive in &source.spec().binds {
                let target = selector::resolve(components, source.name(), directive.target(source.name())?)?;
                outcomes.push(self.bind_one(&**source, target, directive)?);
            }
        }
        tracing::info!(count = outcomes.len(), "bindings applied");
        Ok(outcomes)
    }

    fn bind_one(
        &self,
        source: &dyn Component,
        target: &dyn Component,
        directive: &BindingDirective,
    ) -> Result<BindingOutcome> {
        let available = target.capabilities()?;
        if !available.contains_key(&directive.capability) {
            return Err(StratusError::InvalidDirective {
                component: source.name().to_string(),
                message: format!(
                    "target \"{}\" does not expose capability \"{}\" (available: {})",
                    target.name(),
                    directive.capability,
                    available.keys().cloned().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let result = match self
            .matrix
            .find_binding_strategy(source.component_type(), &directive.capability)
        {
            Some(strategy) => {
                tracing::debug!(
                    strategy = strategy.name(),
                    source = %source.name(),
                    target = %target.name(),
                    capability = %directive.capability,
                    "applying binding"
                );
                strategy.bind(&BindingContext::new(source, target, directive))?
            }
            None => {
                let err = unsupported(source, target, &directive.capability);
                tracing::warn!(error = %err, "no binding strategy; recorded in outcome");
                BindingResult::failure(
                    NO_STRATEGY,
                    BindingErrorDetail::capture(&err, source.component_type(), target.component_type()),
                )
            }
        };

        Ok(BindingOutcome {
            source: source.id(),
            target: target.id(),
            capability: directive.capability.clone(),
            access: directive.access,
            result,
        })
    }

    // Phase 3, triggers.
    fn trigger_all(&self, components: &[Box<dyn Component>]) -> Result<Vec<TriggerOutcome>> {
        let mut outcomes = Vec::new();
        for source in components {
            for directive in &source.spec().triggers {
                let target = selector::resolve(components, source.name(), directive.target(source.name())?)?;
                outcomes.push(self.trigger_one(&**source, target, directive)?);
            }
        }
        tracing::info!(count = outcomes.len(), "triggers applied");
        Ok(outcomes)
    }

    fn trigger_one(
        &self,
        source: &dyn Component,
        target: &dyn Component,
        directive: &TriggerDirective,
    ) -> Result<TriggerOutcome> {
        let result = match self.matrix.find_trigger_strategy(
            source.component_type(),
            target.component_type(),
            &directive.event_type,
        ) {
            Some(strategy) => {
                tracing::debug!(
                    strategy = strategy.name(),
                    source = %source.name(),
                    target = %target.name(),
                    event = %directive.event_type,
                    "applying trigger"
                );
                strategy.bind(&TriggerContext::new(source, target, directive))?
            }
            None => {
                let err = unsupported(source, target, &directive.event_type);
                tracing::warn!(error = %err, "no trigger strategy; recorded in outcome");
                TriggerResult::failure(
                    NO_STRATEGY,
                    BindingErrorDetail::capture(&err, source.component_type(), target.component_type()),
                )
            }
        };

        Ok(TriggerOutcome {
            source: source.id(),
            target: target.id(),
            event_type: directive.event_type.clone(),
            access: directive.access,
            result,
        })
    }

    // Phase 4.
    fn patch_all(&self, context: &ComponentContext, components: &[Box<dyn Component>]) -> Result<Vec<String>> {
        if self.patches.is_empty() {
            tracing::debug!("no patch modules configured");
            return Ok(Vec::new());
        }
        let view = ConstructView::new(context, components);
        let mut applied = Vec::with_capacity(self.patches.len());
        for module in &self.patches {
            module.apply(&view).map_err(|e| StratusError::Patch {
                module: module.name().to_string(),
                message: e.to_string(),
            })?;
            tracing::info!(module = module.name(), "patch module applied");
            applied.push(module.name().to_string());
        }
        Ok(applied)
    }
}

impl fmt::Debug for ResolverEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverEngine")
            .field("framework", &self.framework)
            .field("registry", &self.registry)
            .field("matrix", &self.matrix)
            .field(
                "patches",
                &self.patches.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn unsupported(source: &dyn Component, target: &dyn Component, requested: &str) -> StratusError {
    StratusError::UnsupportedBinding {
        source_type: source.component_type().to_string(),
        target_type: target.component_type().to_string(),
        requested: requested.to_string(),
    }
}
