//! Service-wide environment shared by all components of one synthesis run.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stratus_common::error::Result;
use stratus_common::types::ComplianceFramework;

use crate::spec::Manifest;

/// Region assumed when the manifest does not name one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Account assumed when the manifest does not name one.
pub const DEFAULT_ACCOUNT: &str = "000000000000";

/// Governance settings declared at the service level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GovernanceConfig {
    /// Data classification, e.g. `confidential`.
    pub data_classification: Option<String>,
    /// Whether backups are mandatory.
    pub backup_required: Option<bool>,
    /// Monitoring level, e.g. `enhanced`.
    pub monitoring_level: Option<String>,
    /// Whether audit logging is mandatory.
    pub audit_logging_required: Option<bool>,
    /// Log retention in days.
    pub log_retention_days: Option<u32>,
}

/// Security settings declared at the service level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityConfig {
    /// VPC endpoints through which regulated traffic must arrive.
    pub allowed_vpc_endpoints: Vec<String>,
    /// Customer-managed key used for encryption at rest.
    pub kms_key_arn: Option<String>,
}

/// Observability settings declared at the service level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObservabilityConfig {
    /// Whether distributed tracing is enabled on compute.
    pub tracing_enabled: bool,
    /// Log retention override in days.
    pub log_retention_days: Option<u32>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            tracing_enabled: true,
            log_retention_days: None,
        }
    }
}

/// Service-wide environment; never mutated after construction.
#[derive(Debug, Clone)]
pub struct ComponentContext {
    /// Service name.
    pub service_name: String,
    /// Owning team.
    pub owner: Option<String>,
    /// Deployment environment.
    pub environment: String,
    /// Active compliance tier.
    pub compliance_framework: ComplianceFramework,
    /// Deployment region.
    pub region: Option<String>,
    /// Deployment account.
    pub account_id: Option<String>,
    /// Service-wide labels.
    pub labels: BTreeMap<String, String>,
    /// Observability settings.
    pub observability: ObservabilityConfig,
    /// Security settings.
    pub security: SecurityConfig,
    /// Governance settings.
    pub governance: GovernanceConfig,
    /// Directory holding the per-tier platform configuration files.
    pub config_dir: PathBuf,
}

impl ComponentContext {
    /// Creates a context with default sub-configurations.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        environment: impl Into<String>,
        compliance_framework: ComplianceFramework,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            owner: None,
            environment: environment.into(),
            compliance_framework,
            region: None,
            account_id: None,
            labels: BTreeMap::new(),
            observability: ObservabilityConfig::default(),
            security: SecurityConfig::default(),
            governance: GovernanceConfig::default(),
            config_dir: PathBuf::from(stratus_common::constants::DEFAULT_CONFIG_DIR),
        }
    }

    /// Builds the context described by a manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest names an unsupported compliance framework.
    pub fn from_manifest(manifest: &Manifest, config_dir: impl Into<PathBuf>) -> Result<Self> {
        let framework: ComplianceFramework = manifest.compliance_framework.parse()?;
        Ok(Self {
            service_name: manifest.service.clone(),
            owner: manifest.owner.clone(),
            environment: manifest.environment.clone(),
            compliance_framework: framework,
            region: manifest.region.clone(),
            account_id: manifest.account_id.clone(),
            labels: manifest.labels.clone(),
            observability: manifest.observability.clone(),
            security: manifest.security.clone(),
            governance: manifest.governance.clone(),
            config_dir: config_dir.into(),
        })
    }

    /// Sets the platform configuration directory.
    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Sets the deployment region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets the security settings.
    #[must_use]
    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    /// Returns the region, falling back to [`DEFAULT_REGION`].
    #[must_use]
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Returns the account, falling back to [`DEFAULT_ACCOUNT`].
    #[must_use]
    pub fn account(&self) -> &str {
        self.account_id.as_deref().unwrap_or(DEFAULT_ACCOUNT)
    }

    /// Returns the physical resource name for a component.
    #[must_use]
    pub fn resource_name(&self, component: &str) -> String {
        format!("{}-{}-{component}", self.service_name, self.environment)
    }

    /// Returns the prefix every resource name of this service starts with.
    #[must_use]
    pub fn resource_prefix(&self) -> String {
        format!("{}-{}-", self.service_name, self.environment)
    }

    /// Builds a resource ARN in this context's partition, region and account.
    #[must_use]
    pub fn arn(&self, service: &str, resource: &str) -> String {
        format!("arn:{}:{service}:{}:{}:{resource}", self.partition(), self.region(), self.account())
    }

    /// Returns the ARN partition implied by the region.
    #[must_use]
    pub fn partition(&self) -> &'static str {
        if self.region().starts_with("us-gov-") {
            "aws-us-gov"
        } else {
            "aws"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_manifest_rejects_unknown_framework() {
        let manifest: Manifest =
            serde_yaml::from_str("service: s\ncomplianceFramework: iso27001\n").expect("parse");
        let err = ComponentContext::from_manifest(&manifest, "config").unwrap_err();
        assert!(err.to_string().contains("iso27001"));
    }

    #[test]
    fn arn_uses_gov_partition_for_gov_regions() {
        let ctx = ComponentContext::new("orders", "prod", ComplianceFramework::FedrampHigh)
            .with_region("us-gov-west-1");
        assert_eq!(
            ctx.arn("sqs", "orders-prod-queue"),
            "arn:aws-us-gov:sqs:us-gov-west-1:000000000000:orders-prod-queue"
        );
    }

    #[test]
    fn resource_name_is_prefixed() {
        let ctx = ComponentContext::new("orders", "dev", ComplianceFramework::Commercial);
        assert_eq!(ctx.resource_name("api"), "orders-dev-api");
        assert!(ctx.resource_name("api").starts_with(&ctx.resource_prefix()));
    }
}
