//! Built-in trigger strategies: queue messages, bucket object events and
//! topic subscriptions.

pub mod s3;
pub mod sns;
pub mod sqs;

use stratus_common::error::{Result, StratusError};

use crate::context::TriggerContext;
use crate::strategy::TriggerStrategy;

/// Component types that consume events as functions.
pub const FUNCTION_TYPES: &[&str] = &["lambda-api", "lambda-worker"];

/// Every built-in trigger strategy, in registration order.
#[must_use]
pub fn builtin() -> Vec<Box<dyn TriggerStrategy>> {
    vec![
        Box::new(sqs::SqsToLambda),
        Box::new(s3::S3ToLambda),
        Box::new(sns::SnsSubscription),
    ]
}

/// Checks that the strategy advertises the directive's access for this
/// source, target and event.
pub(crate) fn ensure_access(strategy: &dyn TriggerStrategy, context: &TriggerContext<'_>) -> Result<()> {
    let directive = context.directive;
    let supported = strategy.compatibility_matrix().iter().any(|entry| {
        entry.source_type == context.source.component_type()
            && entry.target_type == context.target.component_type()
            && entry.event_type == directive.event_type
            && entry.supports(directive.access)
    });
    if supported {
        Ok(())
    } else {
        Err(StratusError::binding(format!(
            "{} does not support access \"{}\" for event \"{}\"",
            strategy.name(),
            directive.access,
            directive.event_type
        )))
    }
}
