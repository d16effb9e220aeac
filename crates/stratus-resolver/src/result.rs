//! The synthesis report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use stratus_binding::result::{BindingResult, TriggerResult};
use stratus_common::error::Result;
use stratus_common::types::{AccessLevel, ComplianceFramework, ComponentId, TriggerAccess};
use stratus_core::component::ComponentSummary;
use uuid::Uuid;

/// One applied `binds` directive.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingOutcome {
    /// Declaring component.
    pub source: ComponentId,
    /// Resolved target.
    pub target: ComponentId,
    /// Requested capability.
    pub capability: String,
    /// Requested access.
    pub access: AccessLevel,
    /// Strategy output or recorded failure.
    pub result: BindingResult,
}

/// One applied `triggers` directive.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerOutcome {
    /// Event source, the declaring component.
    pub source: ComponentId,
    /// Event consumer.
    pub target: ComponentId,
    /// Event name.
    pub event_type: String,
    /// Requested access.
    pub access: TriggerAccess,
    /// Strategy output or recorded failure.
    pub result: TriggerResult,
}

/// Everything one synthesis run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisResult {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// Service name.
    pub service: String,
    /// Environment name.
    pub environment: String,
    /// Active compliance tier.
    pub compliance_framework: ComplianceFramework,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
    /// Synthesized components, in declaration order.
    pub components: Vec<ComponentSummary>,
    /// Binding outcomes, in declaration order.
    pub bindings: Vec<BindingOutcome>,
    /// Trigger outcomes, in declaration order.
    pub triggers: Vec<TriggerOutcome>,
    /// Whether any patch module ran.
    pub patches_applied: bool,
    /// Names of the patch modules that ran.
    pub patch_modules: Vec<String>,
    /// Hex SHA-256 of the synthesized infrastructure and outcome identities.
    pub fingerprint: String,
}

impl SynthesisResult {
    /// Summary of the component called `name`.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&ComponentSummary> {
        self.components.iter().find(|c| c.id.name == name)
    }

    /// Bindings whose strategy failed or was missing.
    pub fn failed_bindings(&self) -> impl Iterator<Item = &BindingOutcome> {
        self.bindings.iter().filter(|o| !o.result.is_success())
    }

    /// Triggers whose strategy failed or was missing.
    pub fn failed_triggers(&self) -> impl Iterator<Item = &TriggerOutcome> {
        self.triggers.iter().filter(|o| !o.result.is_success())
    }

    /// Number of failed binding and trigger outcomes.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed_bindings().count() + self.failed_triggers().count()
    }
}

/// Deterministic part of a run, hashed into the fingerprint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FingerprintInput<'a> {
    components: &'a [ComponentSummary],
    bindings: Vec<OutcomeKey<'a>>,
    triggers: Vec<OutcomeKey<'a>>,
}

#[derive(Serialize)]
struct OutcomeKey<'a> {
    source: &'a ComponentId,
    target: &'a ComponentId,
    requested: &'a str,
    strategy: &'a str,
    success: bool,
}

/// Computes the content fingerprint of a run.
///
/// Timestamps and run ids are excluded so identical inputs hash equally.
///
/// # Errors
///
/// Returns an error if the components cannot be serialized.
pub fn fingerprint(
    components: &[ComponentSummary],
    bindings: &[BindingOutcome],
    triggers: &[TriggerOutcome],
) -> Result<String> {
    let input = FingerprintInput {
        components,
        bindings: bindings
            .iter()
            .map(|o| OutcomeKey {
                source: &o.source,
                target: &o.target,
                requested: &o.capability,
                strategy: &o.result.metadata.strategy,
                success: o.result.is_success(),
            })
            .collect(),
        triggers: triggers
            .iter()
            .map(|o| OutcomeKey {
                source: &o.source,
                target: &o.target,
                requested: &o.event_type,
                strategy: &o.result.metadata.strategy,
                success: o.result.is_success(),
            })
            .collect(),
    };
    let canonical = serde_json::to_vec(&input)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(format!("{:x}", hasher.finalize()))
}
