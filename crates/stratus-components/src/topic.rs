//! Pub/sub component: `sns-topic`.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use stratus_common::constants::MAIN_CONSTRUCT;
use stratus_common::error::Result;
use stratus_core::component::{Component, SynthesisState};
use stratus_core::config::ConfigSchema;
use stratus_core::construct::{Construct, Topic};
use stratus_core::context::ComponentContext;
use stratus_core::spec::ComponentSpec;

use crate::base::ComponentBase;

/// Type key.
pub const SNS_TOPIC: &str = "sns-topic";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopicConfig {
    fifo: bool,
    display_name: Option<String>,
}

/// A pub/sub topic.
#[derive(Debug)]
pub struct TopicComponent {
    base: ComponentBase,
}

impl TopicComponent {
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
        ConfigSchema::new(json!({"fifo": false}))
    }
}

impl Component for TopicComponent {
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
        let config: TopicConfig = self.base.config().build_typed(&Self::schema())?;
        let ctx = Arc::clone(&self.base.context);

        let mut name = self.base.physical_name();
        if config.fifo {
            name.push_str(".fifo");
        }
        let topic = Topic::new(self.base.logical_id("Topic"), &name, ctx.arn("sns", &name));

        self.base.state.register_capability(
            "topic:sns",
            json!({
                "topicArn": topic.arn,
                "topicName": topic.topic_name,
                "displayName": config.display_name.unwrap_or_else(|| self.base.spec.name.clone()),
            }),
        );
        self.base.state.register_construct(MAIN_CONSTRUCT, Construct::Topic(topic));

        self.base.state.validate_synthesized(&self.base.spec.name)?;
        self.base.log_synthesized();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use stratus_common::types::ComplianceFramework;

    use super::*;
    use crate::testing::context;

    #[test]
    fn exposes_topic_capability() {
        let spec = ComponentSpec::new("events", SNS_TOPIC);
        let mut topic = TopicComponent::create(&spec, &context(ComplianceFramework::Commercial))
            .expect("create");
        topic.synth().expect("synth");
        let caps = topic.capabilities().expect("caps");
        assert_eq!(caps["topic:sns"]["topicName"], "orders-dev-events");
        assert_eq!(caps["topic:sns"]["displayName"], "events");
        assert!(topic.construct("main").and_then(Construct::as_topic).is_some());
    }
}
