use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{EngineChoice, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `truthlens` binary.
#[derive(Debug, Parser)]
#[command(
    name = "truthlens",
    version,
    about = "TruthLens - credibility analysis with a synced history"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Number of history records to show
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Analysis engine, overriding `engine.mode` from config
    #[arg(short, long, global = true)]
    pub engine: Option<EngineChoice>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            engine: self.engine,
        }
    }
}
