//! Every built-in component type and its creator.

use std::sync::Arc;

use stratus_common::error::Result;
use stratus_core::component::Component;
use stratus_core::context::ComponentContext;
use stratus_core::spec::ComponentSpec;

use crate::bucket::{BucketComponent, S3_BUCKET};
use crate::database::{DatabaseComponent, RDS_POSTGRES};
use crate::function::{FunctionComponent, LAMBDA_API, LAMBDA_WORKER};
use crate::queue::{QueueComponent, SQS_QUEUE};
use crate::table::{DYNAMODB_TABLE, TableComponent};
use crate::topic::{SNS_TOPIC, TopicComponent};

/// Plain-function creator of a built-in component.
pub type BuiltinCreator = fn(&ComponentSpec, &Arc<ComponentContext>) -> Result<Box<dyn Component>>;

/// Built-in types in catalog order.
pub const BUILTIN: &[(&str, BuiltinCreator)] = &[
    (LAMBDA_API, FunctionComponent::create_api),
    (LAMBDA_WORKER, FunctionComponent::create_worker),
    (SQS_QUEUE, QueueComponent::create),
    (S3_BUCKET, BucketComponent::create),
    (DYNAMODB_TABLE, TableComponent::create),
    (SNS_TOPIC, TopicComponent::create),
    (RDS_POSTGRES, DatabaseComponent::create),
];

/// Returns the creator for a built-in type.
#[must_use]
pub fn creator(component_type: &str) -> Option<BuiltinCreator> {
    BUILTIN
        .iter()
        .find(|(name, _)| *name == component_type)
        .map(|(_, create)| *create)
}
