//! Object storage component: `s3-bucket`.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use stratus_common::constants::MAIN_CONSTRUCT;
use stratus_common::error::Result;
use stratus_core::component::{Component, SynthesisState};
use stratus_core::config::ConfigSchema;
use stratus_core::construct::{Bucket, Construct};
use stratus_core::context::ComponentContext;
use stratus_core::spec::ComponentSpec;

use crate::base::ComponentBase;

/// Type key.
pub const S3_BUCKET: &str = "s3-bucket";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketConfig {
    versioned: bool,
    enforce_encryption: bool,
}

/// An object storage bucket.
#[derive(Debug)]
pub struct BucketComponent {
    base: ComponentBase,
}

impl BucketComponent {
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
        ConfigSchema::new(json!({"versioned": false, "enforceEncryption": false}))
    }
}

impl Component for BucketComponent {
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
        let config: BucketConfig = self.base.config().build_typed(&Self::schema())?;
        let governance = self.base.governance();
        let ctx = Arc::clone(&self.base.context);

        let name = self.base.physical_name();
        let arn = format!("arn:{}:s3:::{name}", ctx.partition());
        let bucket = Bucket::new(self.base.logical_id("Bucket"), &name, arn);
        if config.versioned || governance.backup_required {
            bucket.enable_versioning();
        }
        if config.enforce_encryption || ctx.compliance_framework.is_regulated() {
            bucket.enforce_encryption();
        }

        self.base.state.register_capability(
            "bucket:s3",
            json!({
                "bucketName": bucket.bucket_name,
                "bucketArn": bucket.arn,
                "versioned": bucket.versioned(),
            }),
        );
        self.base.state.register_construct(MAIN_CONSTRUCT, Construct::Bucket(bucket));

        self.base.state.validate_synthesized(&self.base.spec.name)?;
        self.base.log_synthesized();
        Ok(())
    }
}
