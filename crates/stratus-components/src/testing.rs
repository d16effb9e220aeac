use std::path::PathBuf;
use std::sync::Arc;

use stratus_common::types::ComplianceFramework;
use stratus_core::context::ComponentContext;

/// Workspace platform configuration shipped with the repository.
pub fn config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config")
}

pub fn context(framework: ComplianceFramework) -> Arc<ComponentContext> {
    Arc::new(ComponentContext::new("orders", "dev", framework).with_config_dir(config_dir()))
}
