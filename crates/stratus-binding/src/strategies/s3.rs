//! Compute to object storage.

use stratus_common::error::Result;

use crate::access;
use crate::compat::CompatibilityEntry;
use crate::context::BindingContext;
use crate::hardening;
use crate::result::BindingResult;
use crate::strategy::{self, BindingStrategy, EnvWriter};

/// Grants a function access to a bucket and exports its name and ARN.
///
/// Option `enforceEncryption: true` denies unencrypted uploads through the
/// bucket policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputeToS3;

impl BindingStrategy for ComputeToS3 {
    fn name(&self) -> &str {
        "compute-to-s3"
    }

    fn compatibility_matrix(&self) -> Vec<CompatibilityEntry> {
        super::compute_entries("s3-bucket", "bucket:s3", "read or write bucket objects")
    }

    fn bind(&self, context: &BindingContext<'_>) -> Result<BindingResult> {
        let (source, target) = strategy::main_constructs(context.source, context.target)?;
        Ok(strategy::recover_binding(self.name(), context, || {
            let function = strategy::as_function(source, context.source)?;
            let bucket = target
                .as_bucket()
                .ok_or_else(|| strategy::unexpected_kind(target, context.target, "bucket"))?;
            let directive = context.directive;

            let enforce = strategy::option_flag(&directive.options, "enforceEncryption")?;

            let actions = access::BUCKET.actions(directive.access);
            hardening::grant(&function.role, bucket, &actions, context.context())?;
            if enforce {
                bucket.enforce_encryption();
            }

            let mut env = EnvWriter::new(function, &directive.env);
            env.set("name", "BUCKET_NAME", &bucket.bucket_name);
            env.set("arn", "BUCKET_ARN", &bucket.arn);
            Ok(BindingResult::success(self.name(), env.finish()))
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stratus_common::types::{AccessLevel, ComplianceFramework};
    use stratus_core::construct::Effect;
    use stratus_core::spec::BindingDirective;

    use super::*;
    use crate::testing::{bucket, lambda};

    #[test]
    fn read_grants_object_and_bucket_resources() {
        let api = lambda("api", ComplianceFramework::Commercial);
        let assets = bucket("assets", ComplianceFramework::Commercial);
        let directive = BindingDirective::to("assets", "bucket:s3", AccessLevel::Read);

        let result = ComputeToS3
            .bind(&BindingContext::new(&api, &assets, &directive))
            .expect("bind");
        assert_eq!(result.environment_variables["BUCKET_NAME"], "orders-dev-assets");

        let statements = api.function().role.statements();
        assert_eq!(statements[0].effect, Effect::Allow);
        assert_eq!(statements[0].resources.len(), 2);
        assert!(!statements[0].actions.iter().any(|a| a == "s3:PutObject"));
    }

    #[test]
    fn enforce_encryption_only_when_requested() {
        let api = lambda("api", ComplianceFramework::Commercial);
        let assets = bucket("assets", ComplianceFramework::Commercial);
        let mut directive = BindingDirective::to("assets", "bucket:s3", AccessLevel::Write);
        let _ = ComputeToS3
            .bind(&BindingContext::new(&api, &assets, &directive))
            .expect("bind");
        assert!(!assets.main().as_bucket().expect("bucket").encryption_enforced());

        let _ = directive.options.insert("enforceEncryption".into(), json!(true));
        let _ = ComputeToS3
            .bind(&BindingContext::new(&api, &assets, &directive))
            .expect("bind");
        assert!(assets.main().as_bucket().expect("bucket").encryption_enforced());
    }

    #[test]
    fn malformed_flag_grants_nothing() {
        let api = lambda("api", ComplianceFramework::Commercial);
        let assets = bucket("assets", ComplianceFramework::Commercial);
        let mut directive = BindingDirective::to("assets", "bucket:s3", AccessLevel::Admin);
        let _ = directive.options.insert("enforceEncryption".into(), json!(1));

        let result = ComputeToS3
            .bind(&BindingContext::new(&api, &assets, &directive))
            .expect("recovered");
        assert!(!result.is_success());
        assert!(api.function().role.statements().is_empty());
    }

    #[test]
    fn high_tier_adds_endpoint_deny() {
        let api = lambda("api", ComplianceFramework::FedrampHigh);
        let assets = bucket("assets", ComplianceFramework::FedrampHigh);
        let directive = BindingDirective::to("assets", "bucket:s3", AccessLevel::Admin);

        let result = ComputeToS3
            .bind(&BindingContext::new(&api, &assets, &directive))
            .expect("bind");
        assert!(result.is_success());
        let statements = api.function().role.statements();
        assert!(statements.iter().any(|s| s.effect == Effect::Deny));
    }
}
