//! `stratus synth`: resolve a manifest into a synthesis report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use stratus_common::config::StratusConfig;
use stratus_common::constants::DEFAULT_CONFIG_DIR;
use stratus_core::context::ComponentContext;
use stratus_resolver::engine::ResolverEngine;

use crate::{manifest, output};

/// Arguments for the `synth` command.
#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Path to the service manifest.
    #[arg(default_value = "stratus.yml")]
    pub manifest: PathBuf,

    /// Directory holding one platform configuration file per tier.
    #[arg(long, env = "STRATUS_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    /// Write the report here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail the run if any binding or trigger outcome failed.
    #[arg(long, env = "STRATUS_STRICT_BINDINGS")]
    pub strict: bool,

    /// Emit single-line JSON.
    #[arg(long)]
    pub compact: bool,
}

impl SynthArgs {
    fn config(&self) -> StratusConfig {
        StratusConfig {
            config_dir: self.config_dir.clone(),
            strict_bindings: self.strict,
        }
    }
}

/// Executes the `synth` command.
///
/// Loads the manifest, builds the engine for its compliance tier,
/// synthesizes every component and writes the report.
///
/// # Errors
///
/// Returns an error on any fatal synthesis error, or, with `--strict`,
/// if any outcome failed.
pub fn execute(args: &SynthArgs) -> anyhow::Result<()> {
    let config = args.config();
    let manifest = manifest::load(&args.manifest)?;
    let context = ComponentContext::from_manifest(&manifest, &config.config_dir)?;
    let engine = ResolverEngine::for_framework(context.compliance_framework)?;

    let result = engine
        .synthesize(&Arc::new(context), &manifest.components)
        .with_context(|| format!("synthesis of {} failed", args.manifest.display()))?;

    output::write_json(&result, args.output.as_deref(), args.compact)?;
    output::notice(&output::summary(&result))?;

    let failures = result.failure_count();
    if config.strict_bindings && failures > 0 {
        anyhow::bail!("{failures} binding or trigger outcome(s) failed (strict mode)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace_config() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config")
    }

    fn args(manifest: PathBuf, output: PathBuf, strict: bool) -> SynthArgs {
        SynthArgs {
            manifest,
            config_dir: workspace_config(),
            output: Some(output),
            strict,
            compact: true,
        }
    }

    const MANIFEST: &str = "\
service: orders
components:
  - name: api
    type: lambda-api
    binds:
      - to: jobs
        capability: queue:sqs
        access: write
      - to: jobs
        capability: queue:sqs
        access: write
        options:
          deadLetterQueue: 42
  - name: jobs
    type: sqs-queue
";

    #[test]
    fn writes_report_and_strict_fails_on_recorded_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = dir.path().join("stratus.yml");
        std::fs::write(&manifest, MANIFEST).expect("write manifest");
        let report = dir.path().join("out.json");

        execute(&args(manifest.clone(), report.clone(), false)).expect("lenient run");
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).expect("read")).expect("json");
        assert_eq!(json["bindings"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["bindings"][0]["result"]["metadata"]["success"], true);
        assert_eq!(json["bindings"][1]["result"]["metadata"]["success"], false);

        let err = execute(&args(manifest, report, true)).unwrap_err();
        assert!(err.to_string().contains("strict"));
    }
}
