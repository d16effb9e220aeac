//! Message queue component: `sqs-queue`.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use stratus_common::constants::MAIN_CONSTRUCT;
use stratus_common::error::Result;
use stratus_core::component::{Component, SynthesisState};
use stratus_core::config::ConfigSchema;
use stratus_core::construct::{Construct, Queue};
use stratus_core::context::ComponentContext;
use stratus_core::spec::ComponentSpec;

use crate::base::ComponentBase;

/// Type key.
pub const SQS_QUEUE: &str = "sqs-queue";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueConfig {
    visibility_timeout_seconds: u64,
    fifo: bool,
    encryption: EncryptionConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncryptionConfig {
    enabled: bool,
    key_alias: String,
}

/// A message queue.
#[derive(Debug)]
pub struct QueueComponent {
    base: ComponentBase,
}

impl QueueComponent {
    /// Registry creator.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the registry creator contract.
    pub fn create(spec: &ComponentSpec, context: &Arc<ComponentContext>) -> Result<Box<dyn Component>> {
        Ok(Box::new(Self {
            base: ComponentBase::new(spec, context),
        }))
    }

    fn schema() -> ConfigSchema {
        ConfigSchema::new(json!({
            "visibilityTimeoutSeconds": 30,
            "fifo": false,
            "encryption": {"enabled": false, "keyAlias": "alias/aws/sqs"},
        }))
    }
}

impl Component for QueueComponent {
    fn spec(&self) -> &ComponentSpec {
        &self.base.spec
    }

    fn context(&self) -> &ComponentContext {
        &self.base.context
    }

    fn state(&self) -> &SynthesisState {
        &self.base.state
    }

    fn synth(&mut self) -> Result<()> {
        if self.base.state.is_synthesized() {
            return Ok(());
        }
        let config: QueueConfig = self.base.config().build_typed(&Self::schema())?;
        let ctx = Arc::clone(&self.base.context);

        let mut name = self.base.physical_name();
        if config.fifo {
            name.push_str(".fifo");
        }
        let url = format!("https://sqs.{}.amazonaws.com/{}/{name}", ctx.region(), ctx.account());
        let mut queue = Queue::new(self.base.logical_id("Queue"), &name, ctx.arn("sqs", &name), url);
        queue.fifo = config.fifo;
        queue.visibility_timeout_seconds = config.visibility_timeout_seconds;

        // Regulated tiers never ship unencrypted queues.
        if config.encryption.enabled || ctx.compliance_framework.is_regulated() {
            let key = ctx
                .security
                .kms_key_arn
                .clone()
                .unwrap_or(config.encryption.key_alias);
            queue.enable_encryption(key);
        }

        self.base.state.register_capability(
            "queue:sqs",
            json!({
                "queueUrl": queue.url,
                "queueArn": queue.arn,
                "queueName": queue.queue_name,
                "fifo": queue.fifo,
            }),
        );
        self.base.state.register_construct(MAIN_CONSTRUCT, Construct::Queue(queue));

        self.base.state.validate_synthesized(&self.base.spec.name)?;
        self.base.log_synthesized();
        Ok(())
    }
}
