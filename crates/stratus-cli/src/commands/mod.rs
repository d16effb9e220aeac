//! CLI command definitions and dispatch.

pub mod catalog;
pub mod matrix;
pub mod synth;

use clap::{Parser, Subcommand};

/// Stratus: compliance-aware infrastructure synthesis.
#[derive(Parser, Debug)]
#[command(name = "stratus", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level when `RUST_LOG` is unset.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize a service manifest and write the report as JSON.
    Synth(synth::SynthArgs),
    /// Show the binding and trigger compatibility matrix.
    Matrix(matrix::MatrixArgs),
    /// List compliance tiers and the component types each allows.
    Catalog(catalog::CatalogArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Synth(args) => synth::execute(&args),
        Command::Matrix(args) => matrix::execute(&args),
        Command::Catalog(args) => catalog::execute(&args),
    }
}
