//! Compute to pub/sub topic.

use stratus_common::error::Result;

use crate::access;
use crate::compat::CompatibilityEntry;
use crate::context::BindingContext;
use crate::hardening;
use crate::result::BindingResult;
use crate::strategy::{self, BindingStrategy, EnvWriter};

/// Grants a function access to a topic and exports its ARN.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputeToSns;

impl BindingStrategy for ComputeToSns {
    fn name(&self) -> &str {
        "compute-to-sns"
    }

    fn compatibility_matrix(&self) -> Vec<CompatibilityEntry> {
        super::compute_entries("sns-topic", "topic:sns", "publish to a topic")
    }

    fn bind(&self, context: &BindingContext<'_>) -> Result<BindingResult> {
        let (source, target) = strategy::main_constructs(context.source, context.target)?;
        Ok(strategy::recover_binding(self.name(), context, || {
            let function = strategy::as_function(source, context.source)?;
            let topic = target
                .as_topic()
                .ok_or_else(|| strategy::unexpected_kind(target, context.target, "topic"))?;

            let actions = access::TOPIC.actions(context.directive.access);
            hardening::grant(&function.role, topic, &actions, context.context())?;

            let mut env = EnvWriter::new(function, &context.directive.env);
            env.set("arn", "TOPIC_ARN", &topic.arn);
            Ok(BindingResult::success(self.name(), env.finish()))
        }))
    }
}

#[cfg(test)]
mod tests {
    use stratus_common::types::{AccessLevel, ComplianceFramework};
    use stratus_core::spec::BindingDirective;

    use super::*;
    use crate::testing::{lambda, queue, topic};

    #[test]
    fn write_grants_publish() {
        let api = lambda("api", ComplianceFramework::Commercial);
        let events = topic("events", ComplianceFramework::Commercial);
        let directive = BindingDirective::to("events", "topic:sns", AccessLevel::Write);

        let result = ComputeToSns
            .bind(&BindingContext::new(&api, &events, &directive))
            .expect("bind");
        assert!(result.environment_variables["TOPIC_ARN"].contains(":sns:"));
        assert!(api.function().role.allowed_actions().contains("sns:Publish"));
    }

    #[test]
    fn wrong_target_kind_is_recovered() {
        let api = lambda("api", ComplianceFramework::Commercial);
        let jobs = queue("jobs", ComplianceFramework::Commercial);
        let directive = BindingDirective::to("jobs", "topic:sns", AccessLevel::Write);

        let result = ComputeToSns
            .bind(&BindingContext::new(&api, &jobs, &directive))
            .expect("recovered");
        assert!(!result.is_success());
        assert!(api.function().role.statements().is_empty());
    }
}
