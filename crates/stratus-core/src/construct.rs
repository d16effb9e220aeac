//! Typed handles to synthesized resources.
//!
//! A component's `synth()` registers constructs under named handles
//! (`"main"` by convention). Strategies and patch modules read them back
//! through [`Construct`] and mutate the parts that bindings are allowed to
//! touch: policies, environment, event sources, ingress rules. The engine
//! is single-threaded, so mutation goes through `RefCell`/`Cell`.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

/// Whether a policy statement allows or denies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    /// Grants the listed actions.
    Allow,
    /// Overrides any allow for the listed actions.
    Deny,
}

/// A single permission statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyStatement {
    /// Statement identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Allow or deny.
    pub effect: Effect,
    /// Actions covered.
    pub actions: Vec<String>,
    /// Resources covered.
    pub resources: Vec<String>,
    /// Condition operator to condition key to value.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub conditions: BTreeMap<String, BTreeMap<String, Value>>,
}

impl PolicyStatement {
    /// Creates an allow statement.
    #[must_use]
    pub fn allow<A: AsRef<str>>(actions: &[A], resources: Vec<String>) -> Self {
        Self::new(Effect::Allow, actions, resources)
    }

    /// Creates a deny statement.
    #[must_use]
    pub fn deny<A: AsRef<str>>(actions: &[A], resources: Vec<String>) -> Self {
        Self::new(Effect::Deny, actions, resources)
    }

    fn new<A: AsRef<str>>(effect: Effect, actions: &[A], resources: Vec<String>) -> Self {
        Self {
            sid: None,
            effect,
            actions: actions.iter().map(|a| a.as_ref().to_string()).collect(),
            resources,
            conditions: BTreeMap::new(),
        }
    }

    /// Sets the statement identifier.
    #[must_use]
    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    /// Adds a condition under `operator`.
    pub fn add_condition(&mut self, operator: &str, key: &str, value: Value) {
        let _ = self
            .conditions
            .entry(operator.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }
}

/// Execution role of a compute construct.
#[derive(Debug, Clone, Serialize)]
pub struct Role {
    /// Role ARN.
    pub arn: String,
    statements: RefCell<Vec<PolicyStatement>>,
}

impl Role {
    /// Creates a role with an empty policy.
    #[must_use]
    pub fn new(arn: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            statements: RefCell::new(Vec::new()),
        }
    }

    /// Appends a statement to the role's inline policy.
    pub fn add_to_policy(&self, statement: PolicyStatement) {
        self.statements.borrow_mut().push(statement);
    }

    /// Returns a copy of the role's statements.
    #[must_use]
    pub fn statements(&self) -> Vec<PolicyStatement> {
        self.statements.borrow().clone()
    }

    /// Returns every action allowed by the role.
    #[must_use]
    pub fn allowed_actions(&self) -> BTreeSet<String> {
        self.statements
            .borrow()
            .iter()
            .filter(|s| s.effect == Effect::Allow)
            .flat_map(|s| s.actions.iter().cloned())
            .collect()
    }
}

/// A resource that permissions can be granted on.
pub trait Grantable {
    /// Primary ARN of the resource.
    fn arn(&self) -> &str;

    /// Resource entries a grant should cover.
    fn grant_resources(&self) -> Vec<String> {
        vec![self.arn().to_string()]
    }

    /// Grants `actions` on this resource to `role`, returning the statement.
    fn grant(&self, role: &Role, actions: &[&str]) -> PolicyStatement {
        let statement = PolicyStatement::allow(actions, self.grant_resources());
        role.add_to_policy(statement.clone());
        statement
    }
}

/// Event source mapping attached to a function.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSourceMapping {
    /// ARN of the polled resource.
    pub event_source_arn: String,
    /// Records per invocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u64>,
    /// Maximum batching window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_batching_window_seconds: Option<u64>,
    /// Destination for failed batches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_failure_destination: Option<String>,
    /// Event filter pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

/// Resource-based permission allowing a service to invoke a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokePermission {
    /// Service principal, e.g. `s3.amazonaws.com`.
    pub principal: String,
    /// Resource allowed to invoke.
    pub source_arn: String,
}

/// Serverless function.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    /// Logical identifier in the synthesized template.
    pub logical_id: String,
    /// Physical function name.
    pub function_name: String,
    /// Function ARN.
    pub arn: String,
    /// Runtime identifier.
    pub runtime: String,
    /// Handler entry point.
    pub handler: String,
    /// Memory in MiB.
    pub memory_size: u64,
    /// Timeout in seconds.
    pub timeout_seconds: u64,
    /// Log retention in days.
    pub log_retention_days: u32,
    /// Whether active tracing is on.
    pub tracing_enabled: bool,
    /// Execution role.
    pub role: Role,
    environment: RefCell<BTreeMap<String, String>>,
    event_sources: RefCell<Vec<EventSourceMapping>>,
    invoke_permissions: RefCell<Vec<InvokePermission>>,
    security_groups: RefCell<Vec<String>>,
}

impl Function {
    /// Creates a function with an empty environment.
    #[must_use]
    pub fn new(
        logical_id: impl Into<String>,
        function_name: impl Into<String>,
        arn: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            function_name: function_name.into(),
            arn: arn.into(),
            runtime: String::new(),
            handler: String::new(),
            memory_size: 128,
            timeout_seconds: 30,
            log_retention_days: stratus_common::constants::DEFAULT_LOG_RETENTION_DAYS,
            tracing_enabled: false,
            role,
            environment: RefCell::new(BTreeMap::new()),
            event_sources: RefCell::new(Vec::new()),
            invoke_permissions: RefCell::new(Vec::new()),
            security_groups: RefCell::new(Vec::new()),
        }
    }

    /// Sets a runtime environment variable.
    pub fn add_environment(&self, key: impl Into<String>, value: impl Into<String>) {
        let _ = self.environment.borrow_mut().insert(key.into(), value.into());
    }

    /// Returns a copy of the runtime environment.
    #[must_use]
    pub fn environment(&self) -> BTreeMap<String, String> {
        self.environment.borrow().clone()
    }

    /// Attaches an event source mapping.
    pub fn add_event_source(&self, mapping: EventSourceMapping) {
        self.event_sources.borrow_mut().push(mapping);
    }

    /// Returns a copy of the attached event source mappings.
    #[must_use]
    pub fn event_sources(&self) -> Vec<EventSourceMapping> {
        self.event_sources.borrow().clone()
    }

    /// Allows `principal` to invoke the function on behalf of `source_arn`.
    pub fn add_invoke_permission(&self, principal: impl Into<String>, source_arn: impl Into<String>) {
        self.invoke_permissions.borrow_mut().push(InvokePermission {
            principal: principal.into(),
            source_arn: source_arn.into(),
        });
    }

    /// Returns a copy of the resource-based invoke permissions.
    #[must_use]
    pub fn invoke_permissions(&self) -> Vec<InvokePermission> {
        self.invoke_permissions.borrow().clone()
    }

    /// Places the function in a security group.
    pub fn attach_security_group(&self, group_id: impl Into<String>) {
        let group_id = group_id.into();
        let mut groups = self.security_groups.borrow_mut();
        if !groups.contains(&group_id) {
            groups.push(group_id);
        }
    }

    /// Returns the security groups the function is placed in.
    #[must_use]
    pub fn security_groups(&self) -> Vec<String> {
        self.security_groups.borrow().clone()
    }
}

impl Grantable for Function {
    fn arn(&self) -> &str {
        &self.arn
    }
}

/// Redrive configuration of a queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetterConfig {
    /// ARN of the dead-letter queue.
    pub target_arn: String,
    /// Receives before a message is moved.
    pub max_receive_count: u64,
}

/// Message queue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Queue {
    /// Logical identifier in the synthesized template.
    pub logical_id: String,
    /// Physical queue name.
    pub queue_name: String,
    /// Queue ARN.
    pub arn: String,
    /// Queue URL.
    pub url: String,
    /// Whether the queue is FIFO.
    pub fifo: bool,
    /// Visibility timeout in seconds.
    pub visibility_timeout_seconds: u64,
    encryption_key: RefCell<Option<String>>,
    dead_letter: RefCell<Option<DeadLetterConfig>>,
    resource_policy: RefCell<Vec<PolicyStatement>>,
}

impl Queue {
    /// Creates an unencrypted queue without redrive.
    #[must_use]
    pub fn new(
        logical_id: impl Into<String>,
        queue_name: impl Into<String>,
        arn: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            queue_name: queue_name.into(),
            arn: arn.into(),
            url: url.into(),
            fifo: false,
            visibility_timeout_seconds: 30,
            encryption_key: RefCell::new(None),
            dead_letter: RefCell::new(None),
            resource_policy: RefCell::new(Vec::new()),
        }
    }

    /// Enables encryption at rest with `key` (a key ARN or managed alias).
    pub fn enable_encryption(&self, key: impl Into<String>) {
        *self.encryption_key.borrow_mut() = Some(key.into());
    }

    /// Returns the encryption key, if encryption is enabled.
    #[must_use]
    pub fn encryption_key(&self) -> Option<String> {
        self.encryption_key.borrow().clone()
    }

    /// Configures redrive to a dead-letter queue.
    pub fn set_dead_letter(&self, config: DeadLetterConfig) {
        *self.dead_letter.borrow_mut() = Some(config);
    }

    /// Returns the redrive configuration.
    #[must_use]
    pub fn dead_letter(&self) -> Option<DeadLetterConfig> {
        self.dead_letter.borrow().clone()
    }

    /// Appends a statement to the queue's resource policy.
    pub fn add_to_resource_policy(&self, statement: PolicyStatement) {
        self.resource_policy.borrow_mut().push(statement);
    }

    /// Returns a copy of the queue's resource policy.
    #[must_use]
    pub fn resource_policy(&self) -> Vec<PolicyStatement> {
        self.resource_policy.borrow().clone()
    }
}

impl Grantable for Queue {
    fn arn(&self) -> &str {
        &self.arn
    }
}

/// Bucket event notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketNotification {
    /// Bucket events, e.g. `s3:ObjectCreated:*`.
    pub events: Vec<String>,
    /// Notified resource.
    pub target_arn: String,
    /// Key prefix filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Key suffix filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

/// Object storage bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Logical identifier in the synthesized template.
    pub logical_id: String,
    /// Physical bucket name.
    pub bucket_name: String,
    /// Bucket ARN.
    pub arn: String,
    versioned: Cell<bool>,
    encryption_enforced: Cell<bool>,
    notifications: RefCell<Vec<BucketNotification>>,
    resource_policy: RefCell<Vec<PolicyStatement>>,
}

impl Bucket {
    /// Creates an unversioned bucket.
    #[must_use]
    pub fn new(logical_id: impl Into<String>, bucket_name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            logical_id: logical_id.into(),
            bucket_name: bucket_name.into(),
            arn: arn.into(),
            versioned: Cell::new(false),
            encryption_enforced: Cell::new(false),
            notifications: RefCell::new(Vec::new()),
            resource_policy: RefCell::new(Vec::new()),
        }
    }

    /// Turns versioning on.
    pub fn enable_versioning(&self) {
        self.versioned.set(true);
    }

    /// Returns whether versioning is on.
    #[must_use]
    pub fn versioned(&self) -> bool {
        self.versioned.get()
    }

    /// Denies unencrypted uploads through the bucket policy.
    pub fn enforce_encryption(&self) {
        if self.encryption_enforced.replace(true) {
            return;
        }
        let mut deny = PolicyStatement::deny(&["s3:PutObject"], vec![format!("{}/*", self.arn)])
            .with_sid("DenyUnencryptedUploads");
        deny.add_condition("Null", "s3:x-amz-server-side-encryption", Value::from("true"));
        self.add_to_resource_policy(deny);
    }

    /// Returns whether unencrypted uploads are denied.
    #[must_use]
    pub fn encryption_enforced(&self) -> bool {
        self.encryption_enforced.get()
    }

    /// Adds an event notification.
    pub fn add_notification(&self, notification: BucketNotification) {
        self.notifications.borrow_mut().push(notification);
    }

    /// Returns a copy of the event notifications.
    #[must_use]
    pub fn notifications(&self) -> Vec<BucketNotification> {
        self.notifications.borrow().clone()
    }

    /// Appends a statement to the bucket policy.
    pub fn add_to_resource_policy(&self, statement: PolicyStatement) {
        self.resource_policy.borrow_mut().push(statement);
    }

    /// Returns a copy of the bucket policy.
    #[must_use]
    pub fn resource_policy(&self) -> Vec<PolicyStatement> {
        self.resource_policy.borrow().clone()
    }
}

impl Grantable for Bucket {
    fn arn(&self) -> &str {
        &self.arn
    }

    fn grant_resources(&self) -> Vec<String> {
        vec![self.arn.clone(), format!("{}/*", self.arn)]
    }
}

/// Key-value table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Logical identifier in the synthesized template.
    pub logical_id: String,
    /// Physical table name.
    pub table_name: String,
    /// Table ARN.
    pub arn: String,
    /// Partition key attribute.
    pub partition_key: String,
    /// Change stream ARN, when streams are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_arn: Option<String>,
    /// Whether point-in-time recovery is on.
    pub point_in_time_recovery: bool,
}

impl Grantable for Table {
    fn arn(&self) -> &str {
        &self.arn
    }

    fn grant_resources(&self) -> Vec<String> {
        vec![self.arn.clone(), format!("{}/index/*", self.arn)]
    }
}

/// Topic subscription.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Delivery protocol, e.g. `lambda` or `sqs`.
    pub protocol: String,
    /// Subscribed endpoint ARN.
    pub endpoint: String,
    /// Message filter policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_policy: Option<Value>,
}

/// Pub/sub topic.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Logical identifier in the synthesized template.
    pub logical_id: String,
    /// Physical topic name.
    pub topic_name: String,
    /// Topic ARN.
    pub arn: String,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl Topic {
    /// Creates a topic without subscriptions.
    #[must_use]
    pub fn new(logical_id: impl Into<String>, topic_name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            logical_id: logical_id.into(),
            topic_name: topic_name.into(),
            arn: arn.into(),
            subscriptions: RefCell::new(Vec::new()),
        }
    }

    /// Adds a subscription.
    pub fn add_subscription(&self, subscription: Subscription) {
        self.subscriptions.borrow_mut().push(subscription);
    }

    /// Returns a copy of the subscriptions.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions.borrow().clone()
    }
}

impl Grantable for Topic {
    fn arn(&self) -> &str {
        &self.arn
    }
}

/// Relational database instance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    /// Logical identifier in the synthesized template.
    pub logical_id: String,
    /// Instance identifier.
    pub identifier: String,
    /// Instance ARN.
    pub arn: String,
    /// Connection endpoint host.
    pub endpoint: String,
    /// Connection port.
    pub port: u16,
    /// ARN of the generated credentials secret.
    pub secret_arn: String,
    /// Database name.
    pub database_name: String,
}

impl Grantable for Database {
    fn arn(&self) -> &str {
        &self.arn
    }

    fn grant_resources(&self) -> Vec<String> {
        vec![self.secret_arn.clone()]
    }
}

/// Inbound rule of a security group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRule {
    /// Peer security group or CIDR.
    pub peer: String,
    /// Allowed TCP port.
    pub port: u16,
    /// Rule description.
    pub description: String,
}

/// Network security group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroup {
    /// Logical identifier in the synthesized template.
    pub logical_id: String,
    /// Group identifier.
    pub group_id: String,
    ingress: RefCell<Vec<IngressRule>>,
}

impl SecurityGroup {
    /// Creates a group with no ingress rules.
    #[must_use]
    pub fn new(logical_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            logical_id: logical_id.into(),
            group_id: group_id.into(),
            ingress: RefCell::new(Vec::new()),
        }
    }

    /// Allows `peer` to reach `port`. Identical rules are not duplicated.
    pub fn allow_ingress(&self, peer: impl Into<String>, port: u16, description: impl Into<String>) {
        let rule = IngressRule {
            peer: peer.into(),
            port,
            description: description.into(),
        };
        let mut ingress = self.ingress.borrow_mut();
        if !ingress.iter().any(|r| r.peer == rule.peer && r.port == rule.port) {
            ingress.push(rule);
        }
    }

    /// Returns a copy of the ingress rules.
    #[must_use]
    pub fn ingress(&self) -> Vec<IngressRule> {
        self.ingress.borrow().clone()
    }
}

/// The closed set of resource kinds a component can expose.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Construct {
    /// Serverless function.
    Function(Function),
    /// Message queue.
    Queue(Queue),
    /// Object storage bucket.
    Bucket(Bucket),
    /// Key-value table.
    Table(Table),
    /// Pub/sub topic.
    Topic(Topic),
    /// Relational database.
    Database(Database),
    /// Network security group.
    SecurityGroup(SecurityGroup),
}

impl Construct {
    /// Short name of the resource kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::Queue(_) => "queue",
            Self::Bucket(_) => "bucket",
            Self::Table(_) => "table",
            Self::Topic(_) => "topic",
            Self::Database(_) => "database",
            Self::SecurityGroup(_) => "security-group",
        }
    }

    /// Logical identifier in the synthesized template.
    #[must_use]
    pub fn logical_id(&self) -> &str {
        match self {
            Self::Function(c) => &c.logical_id,
            Self::Queue(c) => &c.logical_id,
            Self::Bucket(c) => &c.logical_id,
            Self::Table(c) => &c.logical_id,
            Self::Topic(c) => &c.logical_id,
            Self::Database(c) => &c.logical_id,
            Self::SecurityGroup(c) => &c.logical_id,
        }
    }

    /// Returns the construct as a grantable resource, if it is one.
    #[must_use]
    pub fn as_grantable(&self) -> Option<&dyn Grantable> {
        match self {
            Self::Function(c) => Some(c),
            Self::Queue(c) => Some(c),
            Self::Bucket(c) => Some(c),
            Self::Table(c) => Some(c),
            Self::Topic(c) => Some(c),
            Self::Database(c) => Some(c),
            Self::SecurityGroup(_) => None,
        }
    }

    /// Returns the function, if this is one.
    #[must_use]
    pub const fn as_function(&self) -> Option<&Function> {
        if let Self::Function(c) = self { Some(c) } else { None }
    }

    /// Returns the queue, if this is one.
    #[must_use]
    pub const fn as_queue(&self) -> Option<&Queue> {
        if let Self::Queue(c) = self { Some(c) } else { None }
    }

    /// Returns the bucket, if this is one.
    #[must_use]
    pub const fn as_bucket(&self) -> Option<&Bucket> {
        if let Self::Bucket(c) = self { Some(c) } else { None }
    }

    /// Returns the table, if this is one.
    #[must_use]
    pub const fn as_table(&self) -> Option<&Table> {
        if let Self::Table(c) = self { Some(c) } else { None }
    }

    /// Returns the topic, if this is one.
    #[must_use]
    pub const fn as_topic(&self) -> Option<&Topic> {
        if let Self::Topic(c) = self { Some(c) } else { None }
    }

    /// Returns the database, if this is one.
    #[must_use]
    pub const fn as_database(&self) -> Option<&Database> {
        if let Self::Database(c) = self { Some(c) } else { None }
    }

    /// Returns the security group, if this is one.
    #[must_use]
    pub const fn as_security_group(&self) -> Option<&SecurityGroup> {
        if let Self::SecurityGroup(c) = self { Some(c) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> Queue {
        Queue::new(
            "OrdersQueue",
            "orders-dev-queue",
            "arn:aws:sqs:us-east-1:000000000000:orders-dev-queue",
            "https://sqs.us-east-1.amazonaws.com/000000000000/orders-dev-queue",
        )
    }

    #[test]
    fn grant_appends_allow_statement_to_role() {
        let role = Role::new("arn:aws:iam::000000000000:role/api");
        let q = queue();
        let stmt = q.grant(&role, &["sqs:SendMessage"]);
        assert_eq!(stmt.resources, vec![q.arn.clone()]);
        assert!(role.allowed_actions().contains("sqs:SendMessage"));
    }

    #[test]
    fn bucket_grants_cover_objects() {
        let bucket = Bucket::new("Assets", "assets", "arn:aws:s3:::assets");
        assert_eq!(
            bucket.grant_resources(),
            vec!["arn:aws:s3:::assets".to_string(), "arn:aws:s3:::assets/*".to_string()]
        );
    }

    #[test]
    fn enforce_encryption_is_idempotent() {
        let bucket = Bucket::new("Assets", "assets", "arn:aws:s3:::assets");
        bucket.enforce_encryption();
        bucket.enforce_encryption();
        assert_eq!(bucket.resource_policy().len(), 1);
        assert!(bucket.encryption_enforced());
    }

    #[test]
    fn security_group_deduplicates_rules() {
        let sg = SecurityGroup::new("DbSg", "sg-123");
        sg.allow_ingress("sg-api", 5432, "api");
        sg.allow_ingress("sg-api", 5432, "api again");
        assert_eq!(sg.ingress().len(), 1);
    }

    #[test]
    fn construct_serializes_with_kind_tag() {
        let json = serde_json::to_value(Construct::Queue(queue())).expect("serialize");
        assert_eq!(json["kind"], "queue");
        assert_eq!(json["queueName"], "orders-dev-queue");
    }

    #[test]
    fn accessors_match_variant() {
        let c = Construct::Queue(queue());
        assert!(c.as_queue().is_some());
        assert!(c.as_function().is_none());
        assert_eq!(c.kind(), "queue");
        assert!(c.as_grantable().is_some());
    }
}
