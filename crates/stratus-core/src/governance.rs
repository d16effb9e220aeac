//! Governance metadata resolution.
//!
//! Each field is resolved from layered inputs, first non-empty value wins:
//! explicit component policy, then the service governance config, then
//! component labels, then the compliance tier default.

use serde::Serialize;
use serde_json::Value;
use stratus_common::types::ComplianceFramework;

use crate::context::ComponentContext;
use crate::spec::ComponentSpec;

/// Governance requirements applying to one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceMetadata {
    /// Data classification.
    pub data_classification: String,
    /// Whether backups are mandatory.
    pub backup_required: bool,
    /// Monitoring level.
    pub monitoring_level: String,
    /// Whether audit logging is mandatory.
    pub audit_logging_required: bool,
    /// Log retention in days.
    pub log_retention_days: u32,
}

impl GovernanceMetadata {
    /// Returns the baseline for a compliance tier.
    #[must_use]
    pub fn tier_default(framework: ComplianceFramework) -> Self {
        match framework {
            ComplianceFramework::Commercial => Self {
                data_classification: "internal".into(),
                backup_required: false,
                monitoring_level: "basic".into(),
                audit_logging_required: false,
                log_retention_days: stratus_common::constants::DEFAULT_LOG_RETENTION_DAYS,
            },
            ComplianceFramework::FedrampModerate => Self {
                data_classification: "confidential".into(),
                backup_required: true,
                monitoring_level: "enhanced".into(),
                audit_logging_required: true,
                log_retention_days: 365,
            },
            ComplianceFramework::FedrampHigh => Self {
                data_classification: "restricted".into(),
                backup_required: true,
                monitoring_level: "comprehensive".into(),
                audit_logging_required: true,
                log_retention_days: 2555,
            },
        }
    }
}

/// Platform service resolving governance metadata for components.
pub trait GovernanceService {
    /// Resolves the metadata of `spec` within `context`.
    fn resolve(&self, context: &ComponentContext, spec: &ComponentSpec) -> GovernanceMetadata;
}

/// Default layered resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredGovernance;

impl GovernanceService for LayeredGovernance {
    fn resolve(&self, context: &ComponentContext, spec: &ComponentSpec) -> GovernanceMetadata {
        let base = GovernanceMetadata::tier_default(context.compliance_framework);
        let svc = &context.governance;

        let data_classification = policy_str(spec, "dataClassification")
            .or_else(|| non_empty(svc.data_classification.clone()))
            .or_else(|| label(spec, "data-classification"))
            .unwrap_or(base.data_classification);

        let backup_required = policy_bool(spec, "backupRequired")
            .or(svc.backup_required)
            .or_else(|| label(spec, "backup-required").and_then(|v| v.parse().ok()))
            .unwrap_or(base.backup_required);

        let monitoring_level = policy_str(spec, "monitoringLevel")
            .or_else(|| non_empty(svc.monitoring_level.clone()))
            .or_else(|| label(spec, "monitoring-level"))
            .unwrap_or(base.monitoring_level);

        let audit_logging_required = policy_bool(spec, "auditLoggingRequired")
            .or(svc.audit_logging_required)
            .or_else(|| label(spec, "audit-logging").and_then(|v| v.parse().ok()))
            .unwrap_or(base.audit_logging_required);

        let log_retention_days = spec
            .policy
            .get("logRetentionDays")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .or(svc.log_retention_days)
            .or(context.observability.log_retention_days)
            .or_else(|| label(spec, "log-retention-days").and_then(|v| v.parse().ok()))
            .unwrap_or(base.log_retention_days);

        GovernanceMetadata {
            data_classification,
            backup_required,
            monitoring_level,
            audit_logging_required,
            log_retention_days,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn policy_str(spec: &ComponentSpec, key: &str) -> Option<String> {
    spec.policy
        .get(key)
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn policy_bool(spec: &ComponentSpec, key: &str) -> Option<bool> {
    spec.policy.get(key).and_then(Value::as_bool)
}

fn label(spec: &ComponentSpec, key: &str) -> Option<String> {
    non_empty(spec.labels.get(key).cloned())
}
