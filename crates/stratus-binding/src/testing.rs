use serde_json::json;
use stratus_common::types::ComplianceFramework;
use stratus_core::component::{Component, SynthesisState};
use stratus_core::construct::{Bucket, Construct, Database, Function, Queue, Role, SecurityGroup, Table, Topic};
use stratus_core::context::{ComponentContext, SecurityConfig};
use stratus_core::spec::ComponentSpec;

/// Pre-synthesized component with hand-built constructs.
pub struct Fixture {
    spec: ComponentSpec,
    context: ComponentContext,
    state: SynthesisState,
}

impl Fixture {
    pub fn without_constructs(name: &str, component_type: &str, framework: ComplianceFramework) -> Self {
        let mut state = SynthesisState::new();
        state.register_capability("placeholder", json!({}));
        Self {
            spec: ComponentSpec::new(name, component_type),
            context: context(framework),
            state,
        }
    }

    fn with(name: &str, component_type: &str, framework: ComplianceFramework, construct: Construct) -> Self {
        let mut fixture = Self::without_constructs(name, component_type, framework);
        fixture.state.register_construct("main", construct);
        fixture
    }

    pub fn with_security_group(mut self, role: &str) -> Self {
        let id = format!("sg-{}-{role}", self.spec.name);
        self.state.register_security_group(role, SecurityGroup::new(format!("{role}Sg"), id));
        self
    }

    pub fn function(&self) -> &Function {
        self.construct("main").and_then(Construct::as_function).expect("function")
    }

    pub fn main(&self) -> &Construct {
        self.construct("main").expect("main construct")
    }
}

impl Component for Fixture {
    fn spec(&self) -> &ComponentSpec {
        &self.spec
    }

    fn context(&self) -> &ComponentContext {
        &self.context
    }

    fn state(&self) -> &SynthesisState {
        &self.state
    }

    fn synth(&mut self) -> stratus_common::error::Result<()> {
        Ok(())
    }
}

pub fn context(framework: ComplianceFramework) -> ComponentContext {
    ComponentContext::new("orders", "dev", framework).with_security(SecurityConfig {
        allowed_vpc_endpoints: vec!["vpce-0abc".into()],
        kms_key_arn: None,
    })
}

fn physical(name: &str) -> String {
    format!("orders-dev-{name}")
}

pub fn lambda(name: &str, framework: ComplianceFramework) -> Fixture {
    let ctx = context(framework);
    let physical = physical(name);
    let role = Role::new(format!("arn:aws:iam::000000000000:role/{physical}-role"));
    let function = Function::new("Fn", &physical, ctx.arn("lambda", &format!("function:{physical}")), role);
    Fixture::with(name, "lambda-api", framework, Construct::Function(function))
}

pub fn queue(name: &str, framework: ComplianceFramework) -> Fixture {
    let ctx = context(framework);
    let physical = physical(name);
    let url = format!("https://sqs.us-east-1.amazonaws.com/000000000000/{physical}");
    let queue = Queue::new("Q", &physical, ctx.arn("sqs", &physical), url);
    Fixture::with(name, "sqs-queue", framework, Construct::Queue(queue))
}

pub fn bucket(name: &str, framework: ComplianceFramework) -> Fixture {
    let physical = physical(name);
    let bucket = Bucket::new("B", &physical, format!("arn:aws:s3:::{physical}"));
    Fixture::with(name, "s3-bucket", framework, Construct::Bucket(bucket))
}

pub fn table(name: &str, framework: ComplianceFramework, stream: bool) -> Fixture {
    let ctx = context(framework);
    let physical = physical(name);
    let arn = ctx.arn("dynamodb", &format!("table/{physical}"));
    let table = Table {
        logical_id: "T".into(),
        table_name: physical,
        stream_arn: stream.then(|| format!("{arn}/stream/latest")),
        arn,
        partition_key: "id".into(),
        point_in_time_recovery: false,
    };
    Fixture::with(name, "dynamodb-table", framework, Construct::Table(table))
}

pub fn topic(name: &str, framework: ComplianceFramework) -> Fixture {
    let ctx = context(framework);
    let physical = physical(name);
    let topic = Topic::new("T", &physical, ctx.arn("sns", &physical));
    Fixture::with(name, "sns-topic", framework, Construct::Topic(topic))
}

pub fn database(name: &str, framework: ComplianceFramework) -> Fixture {
    let ctx = context(framework);
    let physical = physical(name);
    let database = Database {
        logical_id: "Db".into(),
        identifier: physical.clone(),
        arn: ctx.arn("rds", &format!("db:{physical}")),
        endpoint: format!("{physical}.cluster.us-east-1.rds.amazonaws.com"),
        port: 5432,
        secret_arn: ctx.arn("secretsmanager", &format!("secret:{physical}-credentials")),
        database_name: "app".into(),
    };
    Fixture::with(name, "rds-postgres", framework, Construct::Database(database))
        .with_security_group("database")
}
