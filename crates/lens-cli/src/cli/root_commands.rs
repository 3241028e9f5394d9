use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Analyze a piece of text and record the result in the history.
    Analyze(AnalyzeArgs),
    /// Show the most recent analyses.
    History,
    /// Interactive session: every stdin line is a submission.
    Session,
}

#[derive(Clone, Debug, Args)]
pub struct AnalyzeArgs {
    /// Text to analyze (words are joined with spaces). Use `-` to read stdin.
    #[arg(required_unless_present = "file")]
    pub text: Vec<String>,

    /// Read the text from a file instead.
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}
