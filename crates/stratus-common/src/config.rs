//! Engine settings shared by the resolver and the CLI.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for a Stratus synthesis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StratusConfig {
    /// Directory containing one platform configuration file per tier.
    pub config_dir: PathBuf,
    /// Treat a failed binding or trigger outcome as a failed run.
    pub strict_bindings: bool,
}

impl Default for StratusConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(crate::constants::DEFAULT_CONFIG_DIR),
            strict_bindings: false,
        }
    }
}
