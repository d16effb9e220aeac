//! System-wide constants and default names.

/// Conventional handle name of a component's primary construct.
pub const MAIN_CONSTRUCT: &str = "main";

/// Default directory holding per-tier platform configuration files.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// File extension of platform configuration documents.
pub const PLATFORM_CONFIG_EXTENSION: &str = "yml";

/// Top-level key of a platform configuration document.
pub const PLATFORM_DEFAULTS_KEY: &str = "defaults";

/// Default log retention when nothing more specific is configured.
pub const DEFAULT_LOG_RETENTION_DAYS: u32 = 90;

/// Application name used in CLI output and artifacts.
pub const APP_NAME: &str = "stratus";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "stratus";
