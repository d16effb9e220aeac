//! Compliance-tier hardening applied to every grant a strategy makes.
//!
//! - `commercial`: no change.
//! - `fedramp-moderate`: requests must originate in the deployment region
//!   and use encrypted transport.
//! - `fedramp-high`: moderate, plus every resource must belong to the
//!   service and an explicit deny blocks traffic that does not arrive
//!   through an approved VPC endpoint.

use serde_json::Value;
use stratus_common::error::{Result, StratusError};
use stratus_common::types::ComplianceFramework;
use stratus_core::construct::{Grantable, PolicyStatement, Role};
use stratus_core::context::ComponentContext;

/// Adds tier conditions to `statement` and returns any statements that
/// must accompany it.
///
/// # Errors
///
/// Returns an error under `fedramp-high` if a resource lies outside the
/// service prefix or no VPC endpoint is configured.
pub fn apply(statement: &mut PolicyStatement, context: &ComponentContext) -> Result<Vec<PolicyStatement>> {
    let framework = context.compliance_framework;
    if !framework.is_regulated() {
        return Ok(Vec::new());
    }

    statement.add_condition("StringEquals", "aws:RequestedRegion", Value::from(context.region()));
    statement.add_condition("Bool", "aws:SecureTransport", Value::from("true"));

    if framework != ComplianceFramework::FedrampHigh {
        return Ok(Vec::new());
    }

    for resource in &statement.resources {
        check_ownership(resource, context)?;
    }

    let endpoints = &context.security.allowed_vpc_endpoints;
    if endpoints.is_empty() {
        return Err(StratusError::binding(format!(
            "{framework} requires at least one entry in security.allowedVpcEndpoints"
        )));
    }
    let mut deny = PolicyStatement::deny(&statement.actions, statement.resources.clone())
        .with_sid("DenyOutsideApprovedEndpoints");
    deny.add_condition("StringNotEquals", "aws:SourceVpce", Value::from(endpoints.clone()));

    tracing::debug!(%framework, endpoints = endpoints.len(), "hardening applied");
    Ok(vec![deny])
}

// Services whose ARN resource segment is the bare resource name.
const UNQUALIFIED_SERVICES: &[&str] = &["s3", "sqs", "sns"];

/// Rejects `arn` unless it lives in the context's partition, region and
/// account and its resource name starts with the service prefix.
fn check_ownership(arn: &str, context: &ComponentContext) -> Result<()> {
    let framework = context.compliance_framework;
    let prefix = context.resource_prefix();
    let mut parts = arn.splitn(6, ':');
    let (Some("arn"), Some(partition), Some(service), Some(region), Some(account), Some(resource)) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(StratusError::binding(format!("resource {arn} is not a valid ARN")));
    };

    // Bucket ARNs carry neither region nor account.
    let global = service == "s3" && region.is_empty() && account.is_empty();
    let located = global || (region == context.region() && account == context.account());
    if partition != context.partition() || !located {
        return Err(StratusError::binding(format!(
            "resource {arn} is outside partition {}, region {} and account {} required by {framework}",
            context.partition(),
            context.region(),
            context.account()
        )));
    }

    let name = if UNQUALIFIED_SERVICES.contains(&service) {
        resource.split('/').next()
    } else {
        resource.split([':', '/']).nth(1)
    };
    if !name.is_some_and(|n| n.starts_with(&prefix)) {
        return Err(StratusError::binding(format!(
            "resource {arn} is outside the service prefix \"{prefix}\" required by {framework}"
        )));
    }
    Ok(())
}

/// Grants `actions` on `resource` to `role`, hardened for the active tier.
///
/// Nothing is attached to the role if hardening fails.
///
/// # Errors
///
/// Returns the hardening error.
pub fn grant(
    role: &Role,
    resource: &dyn Grantable,
    actions: &[&str],
    context: &ComponentContext,
) -> Result<()> {
    let mut statement = PolicyStatement::allow(actions, resource.grant_resources());
    let companions = apply(&mut statement, context)?;
    role.add_to_policy(statement);
    for companion in companions {
        role.add_to_policy(companion);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use stratus_core::construct::{Effect, Queue};
    use stratus_core::context::SecurityConfig;

    use super::*;

    fn queue(ctx: &ComponentContext, name: &str) -> Queue {
        Queue::new("Q", name, ctx.arn("sqs", name), "https://example/q")
    }

    fn ctx(framework: ComplianceFramework) -> ComponentContext {
        ComponentContext::new("orders", "prod", framework)
    }

    #[test]
    fn commercial_grants_are_untouched() {
        let ctx = ctx(ComplianceFramework::Commercial);
        let role = Role::new("arn:aws:iam::1:role/r");
        grant(&role, &queue(&ctx, "orders-prod-jobs"), &["sqs:SendMessage"], &ctx).expect("grant");
        let statements = role.statements();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].conditions.is_empty());
    }

    #[test]
    fn moderate_adds_region_and_transport_conditions() {
        let ctx = ctx(ComplianceFramework::FedrampModerate);
        let role = Role::new("arn:aws:iam::1:role/r");
        grant(&role, &queue(&ctx, "orders-prod-jobs"), &["sqs:SendMessage"], &ctx).expect("grant");
        let statements = role.statements();
        assert_eq!(statements.len(), 1);
        let conditions = &statements[0].conditions;
        assert_eq!(conditions["StringEquals"]["aws:RequestedRegion"], "us-east-1");
        assert_eq!(conditions["Bool"]["aws:SecureTransport"], "true");
    }

    #[test]
    fn high_adds_endpoint_deny() {
        let ctx = ctx(ComplianceFramework::FedrampHigh).with_security(SecurityConfig {
            allowed_vpc_endpoints: vec!["vpce-123".into()],
            kms_key_arn: None,
        });
        let role = Role::new("arn:aws:iam::1:role/r");
        grant(&role, &queue(&ctx, "orders-prod-jobs"), &["sqs:SendMessage"], &ctx).expect("grant");
        let statements = role.statements();
        assert_eq!(statements.len(), 2);
        let deny = &statements[1];
        assert_eq!(deny.effect, Effect::Deny);
        assert_eq!(deny.conditions["StringNotEquals"]["aws:SourceVpce"][0], "vpce-123");
        assert!(statements[0].conditions.contains_key("Bool"));
    }

    #[test]
    fn high_without_endpoints_fails_and_grants_nothing() {
        let ctx = ctx(ComplianceFramework::FedrampHigh);
        let role = Role::new("arn:aws:iam::1:role/r");
        let err = grant(&role, &queue(&ctx, "orders-prod-jobs"), &["sqs:SendMessage"], &ctx)
            .unwrap_err();
        assert!(err.to_string().contains("allowedVpcEndpoints"), "got: {err}");
        assert!(role.statements().is_empty());
    }

    #[test]
    fn high_rejects_foreign_resources() {
        let ctx = ctx(ComplianceFramework::FedrampHigh).with_security(SecurityConfig {
            allowed_vpc_endpoints: vec!["vpce-123".into()],
            kms_key_arn: None,
        });
        let role = Role::new("arn:aws:iam::1:role/r");
        let err = grant(&role, &queue(&ctx, "billing-prod-jobs"), &["sqs:SendMessage"], &ctx)
            .unwrap_err();
        assert!(err.to_string().contains("outside the service prefix"), "got: {err}");
    }

    fn high_ctx() -> ComponentContext {
        ctx(ComplianceFramework::FedrampHigh).with_security(SecurityConfig {
            allowed_vpc_endpoints: vec!["vpce-123".into()],
            kms_key_arn: None,
        })
    }

    #[test]
    fn high_rejects_names_that_only_embed_the_prefix() {
        let ctx = high_ctx();
        let role = Role::new("arn:aws:iam::1:role/r");
        let err = grant(&role, &queue(&ctx, "billing-orders-prod-jobs"), &["sqs:SendMessage"], &ctx)
            .unwrap_err();
        assert!(err.to_string().contains("outside the service prefix"), "got: {err}");
        assert!(role.statements().is_empty());
    }

    #[test]
    fn high_rejects_other_accounts_and_regions() {
        let ctx = high_ctx();
        for arn in [
            "arn:aws:sqs:us-east-1:999999999999:orders-prod-jobs",
            "arn:aws:sqs:eu-west-1:000000000000:orders-prod-jobs",
            "arn:aws-us-gov:sqs:us-east-1:000000000000:orders-prod-jobs",
        ] {
            let foreign = Queue::new("Q", "orders-prod-jobs", arn, "https://example/q");
            let role = Role::new("arn:aws:iam::1:role/r");
            let err = grant(&role, &foreign, &["sqs:SendMessage"], &ctx).unwrap_err();
            assert!(err.to_string().contains("outside partition"), "{arn}: {err}");
        }
    }

    #[test]
    fn high_reads_qualified_and_global_resource_names() {
        let ctx = high_ctx();
        let mut owned = PolicyStatement::allow(
            &["dynamodb:GetItem"],
            vec![
                ctx.arn("dynamodb", "table/orders-prod-items"),
                ctx.arn("dynamodb", "table/orders-prod-items/index/*"),
                ctx.arn("secretsmanager", "secret:orders-prod-db-credentials"),
                "arn:aws:s3:::orders-prod-assets/*".to_string(),
            ],
        );
        assert!(apply(&mut owned, &ctx).is_ok());

        let mut foreign = PolicyStatement::allow(
            &["dynamodb:GetItem"],
            vec![ctx.arn("dynamodb", "table/billing-orders-prod-items")],
        );
        assert!(apply(&mut foreign, &ctx).is_err());
    }
}
