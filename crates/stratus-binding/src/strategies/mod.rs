//! Built-in binding strategies: compute to queue, bucket, table, topic and
//! database.

pub mod dynamodb;
pub mod rds;
pub mod s3;
pub mod sns;
pub mod sqs;

use stratus_common::types::AccessLevel;

use crate::compat::CompatibilityEntry;
use crate::strategy::BindingStrategy;

/// Component types that bind as compute.
pub const COMPUTE_TYPES: &[&str] = &["lambda-api", "lambda-worker"];

/// Every built-in binding strategy, in registration order.
#[must_use]
pub fn builtin() -> Vec<Box<dyn BindingStrategy>> {
    vec![
        Box::new(sqs::ComputeToSqs),
        Box::new(s3::ComputeToS3),
        Box::new(dynamodb::ComputeToDynamoDb),
        Box::new(sns::ComputeToSns),
        Box::new(rds::ComputeToRds),
    ]
}

/// One entry per compute type for a `target_type`/`capability` pair.
pub(crate) fn compute_entries(
    target_type: &str,
    capability: &str,
    description: &str,
) -> Vec<CompatibilityEntry> {
    COMPUTE_TYPES
        .iter()
        .map(|source| {
            CompatibilityEntry::new(source, target_type, capability, &AccessLevel::ALL, description)
        })
        .collect()
}
