//! Queue messages invoke a function.

use stratus_common::error::{Result, StratusError};
use stratus_common::types::{AccessLevel, TriggerAccess};
use stratus_core::construct::EventSourceMapping;

use super::FUNCTION_TYPES;
use crate::access;
use crate::compat::TriggerCompatibilityEntry;
use crate::context::TriggerContext;
use crate::hardening;
use crate::result::{TriggerConfiguration, TriggerResult};
use crate::strategy::{self, TriggerStrategy};

const MAX_BATCH_SIZE: u64 = 10_000;

/// Polls a queue from a function through an event source mapping.
///
/// Options: `batchSize` (1 to 10000), `maxBatchingWindowSeconds`,
/// `deadLetterQueue` (ARN receiving failed batches).
#[derive(Debug, Clone, Copy, Default)]
pub struct SqsToLambda;

impl TriggerStrategy for SqsToLambda {
    fn name(&self) -> &str {
        "sqs-to-lambda"
    }

    fn compatibility_matrix(&self) -> Vec<TriggerCompatibilityEntry> {
        FUNCTION_TYPES
            .iter()
            .map(|target| {
                TriggerCompatibilityEntry::new(
                    "sqs-queue",
                    target,
                    "message",
                    &[TriggerAccess::Invoke],
                    "invoke a function for each batch of queue messages",
                )
            })
            .collect()
    }

    fn bind(&self, context: &TriggerContext<'_>) -> Result<TriggerResult> {
        let (source, target) = strategy::main_constructs(context.source, context.target)?;
        Ok(strategy::recover_trigger(self.name(), context, || {
            super::ensure_access(self, context)?;
            let queue = source
                .as_queue()
                .ok_or_else(|| strategy::unexpected_kind(source, context.source, "queue"))?;
            let function = strategy::as_function(target, context.target)?;
            let directive = context.directive;

            let batch_size = strategy::option_u64(&directive.options, "batchSize")?;
            if let Some(size) = batch_size.filter(|s| !(1..=MAX_BATCH_SIZE).contains(s)) {
                return Err(StratusError::binding(format!(
                    "option \"batchSize\" must be between 1 and {MAX_BATCH_SIZE}, got {size}"
                )));
            }
            let window = strategy::option_u64(&directive.options, "maxBatchingWindowSeconds")?;
            let dead_letter = strategy::option_str(&directive.options, "deadLetterQueue")?;

            let actions = access::QUEUE.actions(AccessLevel::Read);
            hardening::grant(&function.role, queue, &actions, context.context())?;
            function.add_event_source(EventSourceMapping {
                event_source_arn: queue.arn.clone(),
                batch_size,
                max_batching_window_seconds: window,
                on_failure_destination: dead_letter.map(str::to_string),
                filter: directive.filter.clone(),
            });

            let mut configuration =
                TriggerConfiguration::new(&directive.event_type, &queue.arn, &function.arn);
            configuration.filter = directive.filter.clone();
            configuration.transform = directive.transform.clone();
            configuration.batch_size = batch_size;
            configuration.max_batching_window_seconds = window;
            configuration.dead_letter_arn = dead_letter.map(str::to_string);
            Ok(TriggerResult::success(self.name(), configuration))
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stratus_common::types::ComplianceFramework;
    use stratus_core::spec::TriggerDirective;

    use super::*;
    use crate::testing::{lambda, queue};

    #[test]
    fn adds_event_source_and_consume_grant() {
        let jobs = queue("jobs", ComplianceFramework::Commercial);
        let worker = lambda("worker", ComplianceFramework::Commercial);
        let mut directive = TriggerDirective::to("worker", "message", TriggerAccess::Invoke);
        let _ = directive.options.insert("batchSize".into(), json!(25));

        let result = SqsToLambda
            .bind(&TriggerContext::new(&jobs, &worker, &directive))
            .expect("bind");
        assert!(result.is_success());
        let configuration = result.configuration.expect("configuration");
        assert_eq!(configuration.batch_size, Some(25));

        let sources = worker.function().event_sources();
        assert_eq!(sources.len(), 1);
        assert!(sources[0].event_source_arn.ends_with(":orders-dev-jobs"));
        assert!(worker.function().role.allowed_actions().contains("sqs:ReceiveMessage"));
    }

    #[test]
    fn out_of_range_batch_is_recovered() {
        let jobs = queue("jobs", ComplianceFramework::Commercial);
        let worker = lambda("worker", ComplianceFramework::Commercial);
        let mut directive = TriggerDirective::to("worker", "message", TriggerAccess::Invoke);
        let _ = directive.options.insert("batchSize".into(), json!(0));

        let result = SqsToLambda
            .bind(&TriggerContext::new(&jobs, &worker, &directive))
            .expect("recovered");
        assert!(!result.is_success());
        assert!(worker.function().event_sources().is_empty());
        assert!(worker.function().role.statements().is_empty());
    }

    #[test]
    fn malformed_window_grants_nothing() {
        let jobs = queue("jobs", ComplianceFramework::Commercial);
        let worker = lambda("worker", ComplianceFramework::Commercial);
        let mut directive = TriggerDirective::to("worker", "message", TriggerAccess::Invoke);
        let _ = directive.options.insert("maxBatchingWindowSeconds".into(), json!("soon"));

        let result = SqsToLambda
            .bind(&TriggerContext::new(&jobs, &worker, &directive))
            .expect("recovered");
        assert!(!result.is_success());
        assert!(worker.function().role.statements().is_empty());
    }

    #[test]
    fn unsupported_access_is_recovered() {
        let jobs = queue("jobs", ComplianceFramework::Commercial);
        let worker = lambda("worker", ComplianceFramework::Commercial);
        let directive = TriggerDirective::to("worker", "message", TriggerAccess::Publish);

        let result = SqsToLambda
            .bind(&TriggerContext::new(&jobs, &worker, &directive))
            .expect("recovered");
        let detail = result.metadata.error.expect("detail");
        assert!(detail.message.contains("publish"), "got: {}", detail.message);
    }
}
