//! `stratus catalog`: list compliance tiers and their component types.

use std::collections::BTreeMap;

use clap::Args;
use stratus_components::factory::ComponentFactoryProvider;

use crate::output;

/// Arguments for the `catalog` command.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Only list this tier.
    #[arg(long)]
    pub framework: Option<String>,
}

/// Executes the `catalog` command.
///
/// # Errors
///
/// Returns an error if the requested tier is not supported.
pub fn execute(args: &CatalogArgs) -> anyhow::Result<()> {
    let frameworks = args
        .framework
        .clone()
        .map_or_else(ComponentFactoryProvider::supported_frameworks, |f| vec![f]);

    let mut catalog = BTreeMap::new();
    for framework in frameworks {
        let factory = ComponentFactoryProvider::create_factory(&framework)?;
        let _ = catalog.insert(framework, factory.supported_components());
    }
    output::write_json(&catalog, None, false)
}
