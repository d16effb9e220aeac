//! Topic messages delivered to a function or a queue.

use serde_json::Value;
use stratus_common::error::Result;
use stratus_common::types::TriggerAccess;
use stratus_core::construct::{Construct, PolicyStatement, Subscription};

use super::FUNCTION_TYPES;
use crate::compat::TriggerCompatibilityEntry;
use crate::context::TriggerContext;
use crate::hardening;
use crate::result::{TriggerConfiguration, TriggerResult};
use crate::strategy::{self, TriggerStrategy};

const PRINCIPAL: &str = "sns.amazonaws.com";

/// Subscribes a function or queue to a topic.
///
/// The directive `filter` becomes the subscription filter policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnsSubscription;

impl TriggerStrategy for SnsSubscription {
    fn name(&self) -> &str {
        "sns-subscription"
    }

    fn compatibility_matrix(&self) -> Vec<TriggerCompatibilityEntry> {
        FUNCTION_TYPES
            .iter()
            .chain(&["sqs-queue"])
            .map(|target| {
                TriggerCompatibilityEntry::new(
                    "sns-topic",
                    target,
                    "message",
                    &[TriggerAccess::Subscribe],
                    "deliver topic messages to a subscriber",
                )
            })
            .collect()
    }

    fn bind(&self, context: &TriggerContext<'_>) -> Result<TriggerResult> {
        let (source, target) = strategy::main_constructs(context.source, context.target)?;
        Ok(strategy::recover_trigger(self.name(), context, || {
            super::ensure_access(self, context)?;
            let topic = source
                .as_topic()
                .ok_or_else(|| strategy::unexpected_kind(source, context.source, "topic"))?;
            let directive = context.directive;

            let (protocol, endpoint) = match target {
                Construct::Function(function) => {
                    function.add_invoke_permission(PRINCIPAL, &topic.arn);
                    ("lambda", function.arn.clone())
                }
                Construct::Queue(queue) => {
                    let mut statement =
                        PolicyStatement::allow(&["sqs:SendMessage"], vec![queue.arn.clone()])
                            .with_sid(format!("AllowDeliveryFrom{}", topic.logical_id));
                    statement.add_condition("ArnEquals", "aws:SourceArn", Value::from(topic.arn.as_str()));
                    let companions = hardening::apply(&mut statement, context.context())?;
                    queue.add_to_resource_policy(statement);
                    for companion in companions {
                        queue.add_to_resource_policy(companion);
                    }
                    ("sqs", queue.arn.clone())
                }
                other => return Err(strategy::unexpected_kind(other, context.target, "function or queue")),
            };

            topic.add_subscription(Subscription {
                protocol: protocol.to_string(),
                endpoint: endpoint.clone(),
                filter_policy: directive.filter.clone(),
            });

            let mut configuration = TriggerConfiguration::new(&directive.event_type, &topic.arn, endpoint);
            configuration.filter = directive.filter.clone();
            configuration.transform = directive.transform.clone();
            Ok(TriggerResult::success(self.name(), configuration))
        }))
    }
}
