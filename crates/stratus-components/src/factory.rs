//! Compliance-aware component factories.
//!
//! [`ComponentFactoryProvider`] dispatches a tier identifier through
//! [`FACTORY_TABLE`]. Each factory exposes the subset of the catalog legal
//! under its tier; a stricter tier's list is always contained in the list
//! of the tier below it.

use stratus_common::error::{Result, StratusError};
use stratus_common::types::ComplianceFramework;
use stratus_core::registry::ComponentRegistry;

use crate::bucket::S3_BUCKET;
use crate::catalog;
use crate::database::RDS_POSTGRES;
use crate::function::{LAMBDA_API, LAMBDA_WORKER};
use crate::queue::SQS_QUEUE;
use crate::table::DYNAMODB_TABLE;
use crate::topic::SNS_TOPIC;

/// Produces the component registry of one compliance tier.
pub trait ComponentFactory {
    /// Tier this factory serves.
    fn framework(&self) -> ComplianceFramework;

    /// Component types available under this tier.
    fn supported_components(&self) -> Vec<String>;

    /// Builds a registry holding a creator for every supported type.
    fn create_registry(&self) -> ComponentRegistry;
}

const COMMERCIAL_TYPES: &[&str] = &[
    LAMBDA_API,
    LAMBDA_WORKER,
    SQS_QUEUE,
    S3_BUCKET,
    DYNAMODB_TABLE,
    SNS_TOPIC,
    RDS_POSTGRES,
];

const FEDRAMP_MODERATE_TYPES: &[&str] = COMMERCIAL_TYPES;

// Fan-out topics are not authorized at the high baseline.
const FEDRAMP_HIGH_TYPES: &[&str] = &[
    LAMBDA_API,
    LAMBDA_WORKER,
    SQS_QUEUE,
    S3_BUCKET,
    DYNAMODB_TABLE,
    RDS_POSTGRES,
];

/// Factory backed by a static list of catalog types.
#[derive(Debug, Clone, Copy)]
pub struct TierFactory {
    framework: ComplianceFramework,
    types: &'static [&'static str],
}

impl TierFactory {
    /// Factory for commercial workloads.
    #[must_use]
    pub const fn commercial() -> Self {
        Self {
            framework: ComplianceFramework::Commercial,
            types: COMMERCIAL_TYPES,
        }
    }

    /// Factory for the moderate regulated tier.
    #[must_use]
    pub const fn fedramp_moderate() -> Self {
        Self {
            framework: ComplianceFramework::FedrampModerate,
            types: FEDRAMP_MODERATE_TYPES,
        }
    }

    /// Factory for the high regulated tier.
    #[must_use]
    pub const fn fedramp_high() -> Self {
        Self {
            framework: ComplianceFramework::FedrampHigh,
            types: FEDRAMP_HIGH_TYPES,
        }
    }
}

impl ComponentFactory for TierFactory {
    fn framework(&self) -> ComplianceFramework {
        self.framework
    }

    fn supported_components(&self) -> Vec<String> {
        self.types.iter().map(|t| (*t).to_string()).collect()
    }

    fn create_registry(&self) -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        for component_type in self.types {
            if let Some(create) = catalog::creator(component_type) {
                registry.register(*component_type, create);
            }
        }
        tracing::debug!(
            framework = %self.framework,
            types = registry.supported_types().len(),
            "component registry created"
        );
        registry
    }
}

type FactoryConstructor = fn() -> Box<dyn ComponentFactory>;

fn commercial() -> Box<dyn ComponentFactory> {
    Box::new(TierFactory::commercial())
}

fn fedramp_moderate() -> Box<dyn ComponentFactory> {
    Box::new(TierFactory::fedramp_moderate())
}

fn fedramp_high() -> Box<dyn ComponentFactory> {
    Box::new(TierFactory::fedramp_high())
}

/// Tier to factory constructor.
pub const FACTORY_TABLE: &[(ComplianceFramework, FactoryConstructor)] = &[
    (ComplianceFramework::Commercial, commercial),
    (ComplianceFramework::FedrampModerate, fedramp_moderate),
    (ComplianceFramework::FedrampHigh, fedramp_high),
];

/// Entry point selecting the factory for a compliance tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentFactoryProvider;

impl ComponentFactoryProvider {
    /// Returns the factory for the tier named `framework`.
    ///
    /// # Errors
    ///
    /// Returns an error listing the supported tiers if `framework` is not one.
    pub fn create_factory(framework: &str) -> Result<Box<dyn ComponentFactory>> {
        let framework: ComplianceFramework = framework.parse()?;
        Self::for_framework(framework)
    }

    /// Returns the factory for an already-parsed tier.
    ///
    /// # Errors
    ///
    /// Returns an error if the tier has no entry in [`FACTORY_TABLE`].
    pub fn for_framework(framework: ComplianceFramework) -> Result<Box<dyn ComponentFactory>> {
        let (_, construct) = FACTORY_TABLE
            .iter()
            .find(|(tier, _)| *tier == framework)
            .ok_or_else(|| StratusError::UnsupportedFramework {
                framework: framework.to_string(),
                supported: Self::supported_frameworks(),
            })?;
        tracing::info!(%framework, "component factory selected");
        Ok(construct())
    }

    /// Tiers with a registered factory.
    #[must_use]
    pub fn supported_frameworks() -> Vec<String> {
        FACTORY_TABLE.iter().map(|(tier, _)| tier.to_string()).collect()
    }
}
