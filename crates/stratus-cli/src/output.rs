//! Output helpers for CLI commands.
//!
//! JSON artifacts go to stdout or a file; human-readable summaries go to
//! stderr so stdout stays machine-readable.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use stratus_resolver::result::SynthesisResult;

/// Serializes `value` as JSON to `path`, or to stdout when `path` is `None`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>, compact: bool) -> anyhow::Result<()> {
    let mut rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    rendered.push('\n');
    match path {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => std::io::stdout().lock().write_all(rendered.as_bytes())?,
    }
    Ok(())
}

/// One-paragraph description of a synthesis run.
#[must_use]
pub fn summary(result: &SynthesisResult) -> String {
    let mut lines = vec![format!(
        "{} ({}, {}): {} component(s), {} binding(s), {} trigger(s), {} failed, {} ms",
        result.service,
        result.environment,
        result.compliance_framework,
        result.components.len(),
        result.bindings.len(),
        result.triggers.len(),
        result.failure_count(),
        result.duration_ms,
    )];
    for outcome in result.failed_bindings() {
        lines.push(format!(
            "  ! bind {} -> {} [{}]: {}",
            outcome.source.name,
            outcome.target.name,
            outcome.capability,
            failure_message(outcome.result.metadata.error.as_ref())
        ));
    }
    for outcome in result.failed_triggers() {
        lines.push(format!(
            "  ! trigger {} -> {} [{}]: {}",
            outcome.source.name,
            outcome.target.name,
            outcome.event_type,
            failure_message(outcome.result.metadata.error.as_ref())
        ));
    }
    lines.push(format!("  fingerprint {}", result.fingerprint));
    lines.join("\n")
}

/// Writes a line to stderr.
///
/// # Errors
///
/// Returns an error if stderr is closed.
pub fn notice(message: &str) -> anyhow::Result<()> {
    writeln!(std::io::stderr().lock(), "{message}")?;
    Ok(())
}

fn failure_message(detail: Option<&stratus_binding::result::BindingErrorDetail>) -> &str {
    detail.map_or("unknown error", |d| d.message.as_str())
}
