//! Bucket object events invoke a function.

use serde_json::Value;
use stratus_common::error::{Result, StratusError};
use stratus_common::types::TriggerAccess;
use stratus_core::construct::BucketNotification;

use super::FUNCTION_TYPES;
use crate::compat::TriggerCompatibilityEntry;
use crate::context::TriggerContext;
use crate::result::{TriggerConfiguration, TriggerResult};
use crate::strategy::{self, TriggerStrategy};

const EVENTS: &[(&str, &str)] = &[
    ("object:created", "s3:ObjectCreated:*"),
    ("object:removed", "s3:ObjectRemoved:*"),
];

const PRINCIPAL: &str = "s3.amazonaws.com";

/// Sends bucket notifications to a function.
///
/// The directive `filter` may carry `prefix` and `suffix` key filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct S3ToLambda;

impl TriggerStrategy for S3ToLambda {
    fn name(&self) -> &str {
        "s3-to-lambda"
    }

    fn compatibility_matrix(&self) -> Vec<TriggerCompatibilityEntry> {
        EVENTS
            .iter()
            .flat_map(|(event, _)| {
                FUNCTION_TYPES.iter().map(move |target| {
                    TriggerCompatibilityEntry::new(
                        "s3-bucket",
                        target,
                        event,
                        &[TriggerAccess::Invoke],
                        "invoke a function on bucket object events",
                    )
                })
            })
            .collect()
    }

    fn bind(&self, context: &TriggerContext<'_>) -> Result<TriggerResult> {
        let (source, target) = strategy::main_constructs(context.source, context.target)?;
        Ok(strategy::recover_trigger(self.name(), context, || {
            super::ensure_access(self, context)?;
            let bucket = source
                .as_bucket()
                .ok_or_else(|| strategy::unexpected_kind(source, context.source, "bucket"))?;
            let function = strategy::as_function(target, context.target)?;
            let directive = context.directive;

            let provider_event = EVENTS
                .iter()
                .find(|(event, _)| *event == directive.event_type)
                .map(|(_, provider)| (*provider).to_string())
                .ok_or_else(|| {
                    StratusError::binding(format!("unsupported bucket event \"{}\"", directive.event_type))
                })?;
            let (prefix, suffix) = key_filter(directive.filter.as_ref())?;

            function.add_invoke_permission(PRINCIPAL, &bucket.arn);
            bucket.add_notification(BucketNotification {
                events: vec![provider_event.clone()],
                target_arn: function.arn.clone(),
                prefix,
                suffix,
            });

            let mut configuration =
                TriggerConfiguration::new(&directive.event_type, &bucket.arn, &function.arn);
            configuration.events = vec![provider_event];
            configuration.filter = directive.filter.clone();
            configuration.transform = directive.transform.clone();
            Ok(TriggerResult::success(self.name(), configuration))
        }))
    }
}

fn key_filter(filter: Option<&Value>) -> Result<(Option<String>, Option<String>)> {
    let Some(filter) = filter else {
        return Ok((None, None));
    };
    let map = filter
        .as_object()
        .ok_or_else(|| StratusError::binding("bucket event filter must be an object"))?;
    let prefix = strategy::option_str(map, "prefix")?.map(str::to_string);
    let suffix = strategy::option_str(map, "suffix")?.map(str::to_string);
    Ok((prefix, suffix))
}
