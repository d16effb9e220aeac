//! Compute to relational database.

use stratus_common::error::Result;

use crate::access;
use crate::compat::CompatibilityEntry;
use crate::context::BindingContext;
use crate::hardening;
use crate::result::BindingResult;
use crate::strategy::{self, BindingStrategy, EnvWriter};

/// Security group role of VPC-attached compute.
pub const COMPUTE_ROLE: &str = "compute";
/// Security group role of databases.
pub const DATABASE_ROLE: &str = "database";

/// Grants a function the database credentials, opens the database
/// security group to the function's group, and exports connection details.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputeToRds;

impl BindingStrategy for ComputeToRds {
    fn name(&self) -> &str {
        "compute-to-rds"
    }

    fn compatibility_matrix(&self) -> Vec<CompatibilityEntry> {
        super::compute_entries("rds-postgres", "db:postgres", "connect to a database")
    }

    fn bind(&self, context: &BindingContext<'_>) -> Result<BindingResult> {
        let (source, target) = strategy::main_constructs(context.source, context.target)?;
        Ok(strategy::recover_binding(self.name(), context, || {
            let function = strategy::as_function(source, context.source)?;
            let database = target
                .as_database()
                .ok_or_else(|| strategy::unexpected_kind(target, context.target, "database"))?;
            let compute_group = context.source.security_group_handle(COMPUTE_ROLE)?;
            let database_group = context.target.security_group_handle(DATABASE_ROLE)?;

            let actions = access::DATABASE.actions(context.directive.access);
            hardening::grant(&function.role, database, &actions, context.context())?;
            database_group.allow_ingress(
                &compute_group.group_id,
                database.port,
                format!("{} to {}", context.source.name(), context.target.name()),
            );

            let mut env = EnvWriter::new(function, &context.directive.env);
            env.set("host", "DB_HOST", &database.endpoint);
            env.set("port", "DB_PORT", database.port.to_string());
            env.set("secretArn", "DB_SECRET_ARN", &database.secret_arn);
            Ok(BindingResult::success(self.name(), env.finish()))
        }))
    }
}
