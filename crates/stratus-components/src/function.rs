//! Serverless function components: `lambda-api` and `lambda-worker`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use stratus_common::constants::MAIN_CONSTRUCT;
use stratus_common::error::Result;
use stratus_core::component::{Component, SynthesisState};
use stratus_core::config::ConfigSchema;
use stratus_core::construct::{Construct, Function, Role, SecurityGroup};
use stratus_core::context::ComponentContext;
use stratus_core::spec::ComponentSpec;

use crate::base::ComponentBase;

/// Type key of the HTTP API function.
pub const LAMBDA_API: &str = "lambda-api";
/// Type key of the background worker function.
pub const LAMBDA_WORKER: &str = "lambda-worker";
/// Security group role registered by VPC-attached functions.
pub const COMPUTE_SECURITY_GROUP: &str = "compute";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionConfig {
    runtime: String,
    handler: String,
    memory_size: u64,
    timeout_seconds: u64,
    #[serde(default)]
    vpc: VpcConfig,
    #[serde(default)]
    environment: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VpcConfig {
    enabled: bool,
}

/// Which flavour of function this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Fronted by an HTTP API.
    Api,
    /// Driven by events only.
    Worker,
}

/// A serverless function.
#[derive(Debug)]
pub struct FunctionComponent {
    base: ComponentBase,
    kind: FunctionKind,
}

impl FunctionComponent {
    /// Creator for `lambda-api`.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the registry creator contract.
    pub fn create_api(spec: &ComponentSpec, context: &Arc<ComponentContext>) -> Result<Box<dyn Component>> {
        Ok(Box::new(Self {
            base: ComponentBase::new(spec, context),
            kind: FunctionKind::Api,
        }))
    }

    /// Creator for `lambda-worker`.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the registry creator contract.
    pub fn create_worker(spec: &ComponentSpec, context: &Arc<ComponentContext>) -> Result<Box<dyn Component>> {
        Ok(Box::new(Self {
            base: ComponentBase::new(spec, context),
            kind: FunctionKind::Worker,
        }))
    }

    fn schema(&self) -> ConfigSchema {
        let (handler, timeout) = match self.kind {
            FunctionKind::Api => ("index.handler", 30),
            FunctionKind::Worker => ("worker.handler", 300),
        };
        ConfigSchema::new(json!({
            "runtime": "nodejs20.x",
            "handler": handler,
            "memorySize": 128,
            "timeoutSeconds": timeout,
            "vpc": {"enabled": false},
        }))
        .require(&["runtime", "handler"])
    }
}

impl Component for FunctionComponent {
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
        let config: FunctionConfig = self.base.config().build_typed(&self.schema())?;
        let governance = self.base.governance();
        let ctx = Arc::clone(&self.base.context);
        let name = self.base.physical_name();

        let role = Role::new(format!(
            "arn:{}:iam::{}:role/{name}-role",
            ctx.partition(),
            ctx.account()
        ));
        let mut function = Function::new(
            self.base.logical_id("Function"),
            &name,
            ctx.arn("lambda", &format!("function:{name}")),
            role,
        );
        function.runtime = config.runtime;
        function.handler = config.handler;
        function.memory_size = config.memory_size;
        function.timeout_seconds = config.timeout_seconds;
        function.log_retention_days = governance.log_retention_days;
        function.tracing_enabled =
            ctx.observability.tracing_enabled || ctx.compliance_framework.is_regulated();
        for (key, value) in config.environment {
            function.add_environment(key, value);
        }

        if config.vpc.enabled {
            let group = SecurityGroup::new(self.base.logical_id("SecurityGroup"), format!("sg-{name}"));
            function.attach_security_group(&group.group_id);
            self.base.state.register_security_group(COMPUTE_SECURITY_GROUP, group);
        }

        let function_capability = json!({
            "functionArn": function.arn,
            "functionName": function.function_name,
            "roleArn": function.role.arn,
        });
        if self.kind == FunctionKind::Api {
            let endpoint = format!(
                "https://{name}.execute-api.{}.amazonaws.com/{}",
                ctx.region(),
                ctx.environment
            );
            self.base
                .state
                .register_capability("api:rest", json!({ "endpoint": endpoint, "functionArn": function.arn }));
        }
        self.base.state.register_capability("lambda:function", function_capability);
        self.base.state.register_construct(MAIN_CONSTRUCT, Construct::Function(function));

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
    fn api_exposes_rest_and_function_capabilities() {
        let spec = ComponentSpec::new("api", LAMBDA_API);
        let mut api = FunctionComponent::create_api(&spec, &context(ComplianceFramework::Commercial))
            .expect("create");
        api.synth().expect("synth");

        let caps = api.capabilities().expect("caps");
        assert!(caps.contains_key("api:rest"));
        assert!(caps.contains_key("lambda:function"));
        let function = api.construct("main").and_then(Construct::as_function).expect("function");
        assert_eq!(function.function_name, "orders-dev-api");
        assert!(function.role.arn.starts_with("arn:aws:iam::"));
    }

    #[test]
    fn worker_has_no_rest_capability() {
        let spec = ComponentSpec::new("worker", LAMBDA_WORKER);
        let mut worker =
            FunctionComponent::create_worker(&spec, &context(ComplianceFramework::Commercial))
                .expect("create");
        worker.synth().expect("synth");
        assert!(!worker.capabilities().expect("caps").contains_key("api:rest"));
    }

    #[test]
    fn regulated_tier_attaches_security_group() {
        let spec = ComponentSpec::new("api", LAMBDA_API);
        let mut api =
            FunctionComponent::create_api(&spec, &context(ComplianceFramework::FedrampModerate))
                .expect("create");
        api.synth().expect("synth");
        let group = api.security_group_handle(COMPUTE_SECURITY_GROUP).expect("group");
        let function = api.construct("main").and_then(Construct::as_function).expect("function");
        assert_eq!(function.security_groups(), vec![group.group_id.clone()]);
        assert!(function.tracing_enabled);
    }

    #[test]
    fn manifest_config_overrides_memory() {
        let mut spec = ComponentSpec::new("api", LAMBDA_API);
        let _ = spec.config.insert("memorySize".into(), json!(1024));
        let mut api = FunctionComponent::create_api(&spec, &context(ComplianceFramework::Commercial))
            .expect("create");
        api.synth().expect("synth");
        let function = api.construct("main").and_then(Construct::as_function).expect("function");
        assert_eq!(function.memory_size, 1024);
    }
}
