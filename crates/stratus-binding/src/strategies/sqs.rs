//! Compute to message queue.

use std::collections::BTreeMap;

use serde_json::Value;
use stratus_common::error::{Result, StratusError};
use stratus_core::construct::{DeadLetterConfig, Function, Queue};
use stratus_core::spec::BindingDirective;

use crate::access;
use crate::compat::CompatibilityEntry;
use crate::context::BindingContext;
use crate::hardening;
use crate::result::BindingResult;
use crate::strategy::{self, BindingStrategy, EnvWriter};

const DEFAULT_MAX_RECEIVE_COUNT: u64 = 3;
const MANAGED_KEY_ALIAS: &str = "alias/aws/sqs";

/// Grants a function access to a queue and exports its URL and ARN.
///
/// Options:
/// - `deadLetterQueue`: ARN string, or `{"arn", "maxReceiveCount"}`;
///   configures redrive on the target queue.
/// - `enableEncryption`: `true` turns on encryption at rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputeToSqs;

impl BindingStrategy for ComputeToSqs {
    fn name(&self) -> &str {
        "compute-to-sqs"
    }

    fn compatibility_matrix(&self) -> Vec<CompatibilityEntry> {
        super::compute_entries("sqs-queue", "queue:sqs", "send to or consume from a queue")
    }

    fn bind(&self, context: &BindingContext<'_>) -> Result<BindingResult> {
        let (source, target) = strategy::main_constructs(context.source, context.target)?;
        Ok(strategy::recover_binding(self.name(), context, || {
            let function = strategy::as_function(source, context.source)?;
            let queue = target
                .as_queue()
                .ok_or_else(|| strategy::unexpected_kind(target, context.target, "queue"))?;
            let directive = context.directive;

            let dead_letter = directive
                .options
                .get("deadLetterQueue")
                .map(dead_letter_config)
                .transpose()?;
            let encrypt = strategy::option_flag(&directive.options, "enableEncryption")?;

            let actions = access::QUEUE.actions(directive.access);
            hardening::grant(&function.role, queue, &actions, context.context())?;
            if let Some(dead_letter) = dead_letter {
                queue.set_dead_letter(dead_letter);
            }
            if encrypt {
                let key = context
                    .context()
                    .security
                    .kms_key_arn
                    .clone()
                    .unwrap_or_else(|| MANAGED_KEY_ALIAS.to_string());
                queue.enable_encryption(key);
            }

            Ok(BindingResult::success(self.name(), export(function, queue, directive)))
        }))
    }
}

fn export(function: &Function, queue: &Queue, directive: &BindingDirective) -> BTreeMap<String, String> {
    let mut env = EnvWriter::new(function, &directive.env);
    env.set("url", "QUEUE_URL", &queue.url);
    env.set("arn", "QUEUE_ARN", &queue.arn);
    env.finish()
}

fn dead_letter_config(value: &Value) -> Result<DeadLetterConfig> {
    match value {
        Value::String(arn) => Ok(DeadLetterConfig {
            target_arn: arn.clone(),
            max_receive_count: DEFAULT_MAX_RECEIVE_COUNT,
        }),
        Value::Object(map) => {
            let target_arn = strategy::option_str(map, "arn")?
                .ok_or_else(|| StratusError::binding("option \"deadLetterQueue\" requires \"arn\""))?
                .to_string();
            let max_receive_count =
                strategy::option_u64(map, "maxReceiveCount")?.unwrap_or(DEFAULT_MAX_RECEIVE_COUNT);
            Ok(DeadLetterConfig {
                target_arn,
                max_receive_count,
            })
        }
        other => Err(StratusError::binding(format!(
            "option \"deadLetterQueue\" must be an ARN or an object, got {other}"
        ))),
    }
}
