//! Key-value table component: `dynamodb-table`.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use stratus_common::constants::MAIN_CONSTRUCT;
use stratus_common::error::Result;
use stratus_core::component::{Component, SynthesisState};
use stratus_core::config::ConfigSchema;
use stratus_core::construct::{Construct, Table};
use stratus_core::context::ComponentContext;
use stratus_core::spec::ComponentSpec;

use crate::base::ComponentBase;

/// Type key.
pub const DYNAMODB_TABLE: &str = "dynamodb-table";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableConfig {
    partition_key: String,
    stream_enabled: bool,
    point_in_time_recovery: bool,
}

/// A key-value table.
#[derive(Debug)]
pub struct TableComponent {
    base: ComponentBase,
}

impl TableComponent {
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
            "partitionKey": "id",
            "streamEnabled": false,
            "pointInTimeRecovery": false,
        }))
        .require(&["partitionKey"])
    }
}

impl Component for TableComponent {
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
        let config: TableConfig = self.base.config().build_typed(&Self::schema())?;
        let governance = self.base.governance();
        let ctx = Arc::clone(&self.base.context);

        let name = self.base.physical_name();
        let arn = ctx.arn("dynamodb", &format!("table/{name}"));
        let stream_arn = config.stream_enabled.then(|| format!("{arn}/stream/latest"));
        let table = Table {
            logical_id: self.base.logical_id("Table"),
            table_name: name,
            arn,
            partition_key: config.partition_key,
            stream_arn,
            point_in_time_recovery: config.point_in_time_recovery || governance.backup_required,
        };

        self.base.state.register_capability(
            "db:dynamodb",
            json!({
                "tableName": table.table_name,
                "tableArn": table.arn,
                "streamArn": table.stream_arn,
                "partitionKey": table.partition_key,
            }),
        );
        self.base.state.register_construct(MAIN_CONSTRUCT, Construct::Table(table));

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
    fn stream_arn_only_when_enabled() {
        let spec = ComponentSpec::new("orders", DYNAMODB_TABLE);
        let mut table = TableComponent::create(&spec, &context(ComplianceFramework::Commercial))
            .expect("create");
        table.synth().expect("synth");
        let caps = table.capabilities().expect("caps");
        assert!(caps["db:dynamodb"]["streamArn"].is_null());

        let mut spec = ComponentSpec::new("orders", DYNAMODB_TABLE);
        let _ = spec.config.insert("streamEnabled".into(), json!(true));
        let mut table = TableComponent::create(&spec, &context(ComplianceFramework::Commercial))
            .expect("create");
        table.synth().expect("synth");
        let construct = table.construct("main").and_then(Construct::as_table).expect("table");
        assert!(construct.stream_arn.as_deref().is_some_and(|s| s.ends_with("/stream/latest")));
    }

    #[test]
    fn regulated_tables_keep_point_in_time_recovery() {
        let spec = ComponentSpec::new("orders", DYNAMODB_TABLE);
        let mut table = TableComponent::create(&spec, &context(ComplianceFramework::FedrampHigh))
            .expect("create");
        table.synth().expect("synth");
        let construct = table.construct("main").and_then(Construct::as_table).expect("table");
        assert!(construct.point_in_time_recovery);
    }
}
