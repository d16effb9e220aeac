//! `stratus matrix`: inspect strategy compatibility.

use clap::Args;
use serde::Serialize;
use stratus_binding::compat::{CompatibilityEntry, TriggerCompatibilityEntry};
use stratus_binding::matrix::BinderMatrix;

use crate::output;

/// Arguments for the `matrix` command.
#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Only show entries whose source is this component type.
    #[arg(long)]
    pub source_type: Option<String>,

    /// With `--source-type`, only show bindings to this target type.
    #[arg(long, requires = "source_type")]
    pub target_type: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Filtered {
    bindings: Vec<CompatibilityEntry>,
    triggers: Vec<TriggerCompatibilityEntry>,
}

/// Executes the `matrix` command.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn execute(args: &MatrixArgs) -> anyhow::Result<()> {
    let matrix = BinderMatrix::with_default_strategies();
    match (&args.source_type, &args.target_type) {
        (None, _) => output::write_json(&matrix.full_compatibility_matrix(), None, false),
        (Some(source), None) => output::write_json(
            &Filtered {
                bindings: matrix.supported_bindings(source),
                triggers: matrix.supported_triggers(source),
            },
            None,
            false,
        ),
        (Some(source), Some(target)) => output::write_json(
            &Filtered {
                bindings: matrix.binding_recommendations(source, target),
                triggers: matrix
                    .supported_triggers(source)
                    .into_iter()
                    .filter(|entry| &entry.target_type == target)
                    .collect(),
            },
            None,
            false,
        ),
    }
}
