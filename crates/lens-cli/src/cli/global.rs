use clap::ValueEnum;
use lens_config::EngineMode;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Raw,
}

/// Engine override from the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum EngineChoice {
    Stub,
    Heuristic,
    Remote,
}

impl From<EngineChoice> for EngineMode {
    fn from(choice: EngineChoice) -> Self {
        match choice {
            EngineChoice::Stub => Self::Stub,
            EngineChoice::Heuristic => Self::Heuristic,
            EngineChoice::Remote => Self::Remote,
        }
    }
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub limit: Option<u32>,
    pub quiet: bool,
    pub verbose: bool,
    pub engine: Option<EngineChoice>,
}
