use std::io::Read;

use anyhow::Context;
use serde::Serialize;

use lens_core::entities::AnalysisResult;
use lens_core::enums::Verdict;
use lens_flow::{RejectReason, Submission, SyncOutcome};

use crate::cli::root_commands::AnalyzeArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::history::{HistoryRow, rows};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct AnalyzeResponse<'a> {
    result: &'a AnalysisResult,
    confidence: f64,
    /// Whether the history below includes this result.
    history_synced: bool,
    history: Vec<HistoryRow>,
}

#[derive(Debug, Serialize)]
struct ResultSummary<'a> {
    verdict: Verdict,
    confidence: f64,
    engine: &'a str,
    processing_time_ms: u64,
    tone: &'a str,
    consistency: &'a str,
    manipulation: &'a str,
}

/// Handle `truthlens analyze`.
pub async fn handle(args: &AnalyzeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let text = read_input(args, std::io::stdin())?;
    let handler = ctx.handler();
    handler.history().load().await;

    let pending = match handler.submit(&text) {
        Submission::Accepted(pending) => pending,
        Submission::Rejected(RejectReason::BlankInput) => {
            anyhow::bail!("nothing to analyze: the text is blank")
        }
        Submission::Rejected(RejectReason::Busy) => {
            anyhow::bail!("another analysis is already in flight")
        }
    };

    let progress = Progress::spinner(&format!("Analyzing with {}", ctx.engine.name()));
    let result = match pending.outcome().await {
        Ok(result) => {
            progress.finish_clear();
            result
        }
        Err(error) => {
            progress.finish_err(&format!("analysis failed ({})", error.kind()));
            return Err(error).context("analysis failed");
        }
    };

    let history_synced = handler
        .settle()
        .await
        .iter()
        .all(|outcome| matches!(outcome, SyncOutcome::Refreshed { .. }));
    let view = handler.history().view();

    if flags.format == OutputFormat::Table {
        let traces = &result.reasoning_traces;
        output(
            &ResultSummary {
                verdict: result.verdict,
                confidence: result.confidence_percent(),
                engine: &result.engine,
                processing_time_ms: result.processing_time_ms,
                tone: &traces.tone,
                consistency: &traces.consistency,
                manipulation: &traces.manipulation,
            },
            flags.format,
        )?;
        println!();
        if !history_synced {
            eprintln!("warning: history could not be updated");
        }
        return output(&rows(&view.records), flags.format);
    }

    output(
        &AnalyzeResponse {
            result: &result,
            confidence: result.confidence_percent(),
            history_synced,
            history: rows(&view.records),
        },
        flags.format,
    )
}

/// Resolve the text from `--file`, `-` (stdin), or the joined words.
fn read_input(args: &AnalyzeArgs, mut stdin: impl Read) -> anyhow::Result<String> {
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }

    if let [only] = args.text.as_slice()
        && only == "-"
    {
        let mut text = String::new();
        stdin
            .read_to_string(&mut text)
            .context("failed to read text from stdin")?;
        return Ok(text);
    }

    Ok(args.text.join(" "))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn args(text: &[&str]) -> AnalyzeArgs {
        AnalyzeArgs {
            text: text.iter().map(ToString::to_string).collect(),
            file: None,
        }
    }

    #[test]
    fn words_are_joined_with_spaces() {
        let text = read_input(&args(&["Sample", "article", "A"]), std::io::empty()).unwrap();
        assert_eq!(text, "Sample article A");
    }

    #[test]
    fn dash_reads_stdin() {
        let stdin = "Breaking news!\nSecond line".as_bytes();
        let text = read_input(&args(&["-"]), stdin).unwrap();
        assert_eq!(text, "Breaking news!\nSecond line");
    }

    #[test]
    fn dash_among_words_is_literal() {
        let text = read_input(&args(&["a", "-", "b"]), std::io::empty()).unwrap();
        assert_eq!(text, "a - b");
    }

    #[test]
    fn file_is_read_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Sample article A").unwrap();

        let input = AnalyzeArgs {
            text: Vec::new(),
            file: Some(file.path().to_path_buf()),
        };
        assert_eq!(read_input(&input, std::io::empty()).unwrap(), "Sample article A");
    }

    #[test]
    fn missing_file_is_an_error() {
        let input = AnalyzeArgs {
            text: Vec::new(),
            file: Some("/nonexistent/truthlens/article.txt".into()),
        };
        let error = read_input(&input, std::io::empty()).unwrap_err();
        assert!(error.to_string().contains("failed to read"));
    }
}
