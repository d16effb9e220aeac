//! Relational database component: `rds-postgres`.
//!
//! Always registers a `securityGroup:database` handle so compute bindings
//! can open ingress on the database port.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use stratus_common::constants::MAIN_CONSTRUCT;
use stratus_common::error::Result;
use stratus_core::component::{Component, SynthesisState};
use stratus_core::config::ConfigSchema;
use stratus_core::construct::{Construct, Database, SecurityGroup};
use stratus_core::context::ComponentContext;
use stratus_core::spec::ComponentSpec;

use crate::base::ComponentBase;

/// Type key.
pub const RDS_POSTGRES: &str = "rds-postgres";
/// Security group role registered by databases.
pub const DATABASE_SECURITY_GROUP: &str = "database";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseConfig {
    database_name: String,
    port: u16,
    instance_class: String,
    multi_az: bool,
    backup_retention_days: u32,
}

/// A relational database instance.
#[derive(Debug)]
pub struct DatabaseComponent {
    base: ComponentBase,
}

impl DatabaseComponent {
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
            "databaseName": "app",
            "port": 5432,
            "instanceClass": "db.t3.micro",
            "multiAz": false,
            "backupRetentionDays": 1,
        }))
        .require(&["databaseName", "port"])
    }
}

impl Component for DatabaseComponent {
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
        let config: DatabaseConfig = self.base.config().build_typed(&Self::schema())?;
        let ctx = Arc::clone(&self.base.context);

        let name = self.base.physical_name();
        let database = Database {
            logical_id: self.base.logical_id("Database"),
            identifier: name.clone(),
            arn: ctx.arn("rds", &format!("db:{name}")),
            endpoint: format!("{name}.cluster.{}.rds.amazonaws.com", ctx.region()),
            port: config.port,
            secret_arn: ctx.arn("secretsmanager", &format!("secret:{name}-credentials")),
            database_name: config.database_name,
        };
        let group = SecurityGroup::new(self.base.logical_id("SecurityGroup"), format!("sg-{name}"));

        tracing::debug!(
            component = %self.base.spec.name,
            instance_class = %config.instance_class,
            multi_az = config.multi_az,
            backup_retention_days = config.backup_retention_days,
            "database sizing resolved"
        );

        self.base.state.register_capability(
            "db:postgres",
            json!({
                "host": database.endpoint,
                "port": database.port,
                "secretArn": database.secret_arn,
                "databaseName": database.database_name,
                "securityGroupId": group.group_id,
            }),
        );
        self.base.state.register_construct(MAIN_CONSTRUCT, Construct::Database(database));
        self.base.state.register_security_group(DATABASE_SECURITY_GROUP, group);

        self.base.state.validate_synthesized(&self.base.spec.name)?;
        self.base.log_synthesized();
        Ok(())
    }
}
