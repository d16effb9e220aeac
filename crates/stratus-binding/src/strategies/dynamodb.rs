//! Compute to key-value table.

use stratus_common::error::{Result, StratusError};
use stratus_core::construct::PolicyStatement;

use crate::access;
use crate::compat::CompatibilityEntry;
use crate::context::BindingContext;
use crate::hardening;
use crate::result::BindingResult;
use crate::strategy::{self, BindingStrategy, EnvWriter};

/// Grants a function access to a table and exports its name and ARN.
///
/// Option `includeStream: true` also grants stream reads and exports
/// `TABLE_STREAM_ARN`; the table must have its stream enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputeToDynamoDb;

impl BindingStrategy for ComputeToDynamoDb {
    fn name(&self) -> &str {
        "compute-to-dynamodb"
    }

    fn compatibility_matrix(&self) -> Vec<CompatibilityEntry> {
        super::compute_entries("dynamodb-table", "db:dynamodb", "read or write table items")
    }

    fn bind(&self, context: &BindingContext<'_>) -> Result<BindingResult> {
        let (source, target) = strategy::main_constructs(context.source, context.target)?;
        Ok(strategy::recover_binding(self.name(), context, || {
            let function = strategy::as_function(source, context.source)?;
            let table = target
                .as_table()
                .ok_or_else(|| strategy::unexpected_kind(target, context.target, "table"))?;
            let directive = context.directive;

            let stream = if strategy::option_flag(&directive.options, "includeStream")? {
                let stream_arn = table.stream_arn.as_deref().ok_or_else(|| {
                    StratusError::binding(format!(
                        "option \"includeStream\" requires a stream on table \"{}\"",
                        table.table_name
                    ))
                })?;
                let mut statement =
                    PolicyStatement::allow(access::TABLE_STREAM, vec![stream_arn.to_string()]);
                let companions = hardening::apply(&mut statement, context.context())?;
                Some((stream_arn, statement, companions))
            } else {
                None
            };

            let actions = access::TABLE.actions(directive.access);
            hardening::grant(&function.role, table, &actions, context.context())?;

            let mut env = EnvWriter::new(function, &directive.env);
            env.set("name", "TABLE_NAME", &table.table_name);
            env.set("arn", "TABLE_ARN", &table.arn);
            if let Some((stream_arn, statement, companions)) = stream {
                function.role.add_to_policy(statement);
                for companion in companions {
                    function.role.add_to_policy(companion);
                }
                env.set("streamArn", "TABLE_STREAM_ARN", stream_arn);
            }

            Ok(BindingResult::success(self.name(), env.finish()))
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stratus_common::types::{AccessLevel, ComplianceFramework};
    use stratus_core::spec::BindingDirective;

    use super::*;
    use crate::testing::{lambda, table};

    #[test]
    fn exports_table_name() {
        let api = lambda("api", ComplianceFramework::Commercial);
        let orders = table("orders", ComplianceFramework::Commercial, false);
        let directive = BindingDirective::to("orders", "db:dynamodb", AccessLevel::ReadWrite);

        let result = ComputeToDynamoDb
            .bind(&BindingContext::new(&api, &orders, &directive))
            .expect("bind");
        assert_eq!(result.environment_variables["TABLE_NAME"], "orders-dev-orders");
        let actions = api.function().role.allowed_actions();
        assert!(actions.contains("dynamodb:PutItem") && actions.contains("dynamodb:Query"));
        assert!(!actions.contains("dynamodb:UpdateTable"));
    }

    #[test]
    fn include_stream_requires_a_stream() {
        let api = lambda("api", ComplianceFramework::Commercial);
        let orders = table("orders", ComplianceFramework::Commercial, false);
        let mut directive = BindingDirective::to("orders", "db:dynamodb", AccessLevel::Read);
        let _ = directive.options.insert("includeStream".into(), json!(true));

        let result = ComputeToDynamoDb
            .bind(&BindingContext::new(&api, &orders, &directive))
            .expect("recovered");
        assert!(!result.is_success());
        let detail = result.metadata.error.expect("detail");
        assert!(detail.message.contains("includeStream"));
        assert!(api.function().role.statements().is_empty());
        assert!(api.function().environment().is_empty());
    }

    #[test]
    fn include_stream_grants_stream_reads() {
        let api = lambda("api", ComplianceFramework::Commercial);
        let orders = table("orders", ComplianceFramework::Commercial, true);
        let mut directive = BindingDirective::to("orders", "db:dynamodb", AccessLevel::Read);
        let _ = directive.options.insert("includeStream".into(), json!(true));

        let result = ComputeToDynamoDb
            .bind(&BindingContext::new(&api, &orders, &directive))
            .expect("bind");
        assert!(result.environment_variables["TABLE_STREAM_ARN"].ends_with("/stream/latest"));
        assert!(api.function().role.allowed_actions().contains("dynamodb:GetRecords"));
    }
}
