use serde::Serialize;
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use lens_core::entities::AnalysisResult;
use lens_core::enums::{AnalysisPhase, EngineErrorKind};
use lens_flow::{AnalysisHandler, AnalysisState, HistoryView, RejectReason, Submission};

use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::history::{HistoryRow, rows};
use crate::context::AppContext;
use crate::output::output;

/// One observable change during a session, printed as it happens.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum SessionEvent<'a> {
    State {
        phase: AnalysisPhase,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<&'a AnalysisResult>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<EventError>,
    },
    History {
        sequence: u64,
        records: Vec<HistoryRow>,
    },
    /// A line arrived while another analysis was in flight.
    Dropped { text: &'a str },
}

#[derive(Debug, Serialize)]
struct EventError {
    kind: EngineErrorKind,
    message: String,
}

impl<'a> SessionEvent<'a> {
    fn from_state(state: &'a AnalysisState) -> Self {
        let (text, result, error) = match state {
            AnalysisState::Idle => (None, None, None),
            AnalysisState::Analyzing { text } => (Some(text.as_str()), None, None),
            AnalysisState::Result(result) => (None, Some(result), None),
            AnalysisState::Error(error) => (
                None,
                None,
                Some(EventError {
                    kind: error.kind(),
                    message: error.to_string(),
                }),
            ),
        };
        Self::State {
            phase: state.phase(),
            text,
            result,
            error,
        }
    }

    fn from_view(view: &HistoryView) -> Self {
        Self::History {
            sequence: view.sequence,
            records: rows(&view.records),
        }
    }
}

/// Handle `truthlens session`.
///
/// Each stdin line is a submission. State and history changes are printed
/// as they are observed; intermediate states may be coalesced.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let handler = ctx.handler();
    let mut state_rx = handler.subscribe();
    let mut view_rx = handler.history().subscribe();
    handler.history().load().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = next_text_line(&mut lines), if stdin_open => match line {
                Ok(Some(line)) => submit(&handler, &line, flags.format)?,
                Ok(None) => {
                    tracing::debug!("stdin closed, draining session");
                    stdin_open = false;
                }
                Err(error) => {
                    tracing::warn!(%error, "stdin read failed, draining session");
                    stdin_open = false;
                }
            },
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                emit(&SessionEvent::from_state(&state), flags.format)?;
            },
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = view_rx.borrow_and_update().clone();
                emit(&SessionEvent::from_view(&view), flags.format)?;
            },
        }

        if !stdin_open && !handler.state().is_analyzing() {
            break;
        }
    }

    // The last sync may still be running; print the view it produces.
    handler.settle().await;
    if state_rx.has_changed().unwrap_or(false) {
        let state = state_rx.borrow_and_update().clone();
        emit(&SessionEvent::from_state(&state), flags.format)?;
    }
    if view_rx.has_changed().unwrap_or(false) {
        let view = view_rx.borrow_and_update().clone();
        emit(&SessionEvent::from_view(&view), flags.format)?;
    }
    Ok(())
}

/// Next line of input, skipping lines that are not valid UTF-8.
async fn next_text_line<R>(lines: &mut Lines<R>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Err(error) if error.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!(%error, "skipping stdin line that is not valid UTF-8");
            }
            other => return other,
        }
    }
}

fn submit(handler: &AnalysisHandler, line: &str, format: OutputFormat) -> anyhow::Result<()> {
    match handler.submit(line) {
        Submission::Accepted(_) | Submission::Rejected(RejectReason::BlankInput) => Ok(()),
        Submission::Rejected(RejectReason::Busy) => {
            emit(&SessionEvent::Dropped { text: line.trim() }, format)
        }
    }
}

fn emit(event: &SessionEvent<'_>, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Raw => output(event, OutputFormat::Raw),
        OutputFormat::Table => print_readable(event, format),
    }
}

fn print_readable(event: &SessionEvent<'_>, format: OutputFormat) -> anyhow::Result<()> {
    match event {
        SessionEvent::State {
            phase,
            text,
            result,
            error,
        } => {
            if let Some(result) = result {
                println!(
                    "[{phase}] {} ({:.1}%)",
                    result.verdict,
                    result.confidence_percent()
                );
                for line in &result.reasoning {
                    println!("  - {line}");
                }
            } else if let Some(error) = error {
                println!("[{phase}] {}: {}", error.kind, error.message);
            } else if let Some(text) = text {
                println!("[{phase}] {text}");
            } else {
                println!("[{phase}]");
            }
            Ok(())
        }
        SessionEvent::History { records, .. } => {
            println!();
            output(records, format)?;
            println!();
            Ok(())
        }
        SessionEvent::Dropped { text } => {
            println!("[dropped] {text}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lens_core::entities::ReasoningTraces;
    use lens_core::errors::EngineError;
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn invalid_utf8_line_is_skipped() {
        let input: &[u8] = b"first\n\xff\xfe broken\nsecond\n";
        let mut lines = BufReader::new(input).lines();

        assert_eq!(next_text_line(&mut lines).await.unwrap().as_deref(), Some("first"));
        assert_eq!(next_text_line(&mut lines).await.unwrap().as_deref(), Some("second"));
        assert_eq!(next_text_line(&mut lines).await.unwrap(), None);
    }

    #[test]
    fn analyzing_state_event_carries_text_only() {
        let state = AnalysisState::Analyzing {
            text: "Sample article A".into(),
        };
        let json = serde_json::to_value(SessionEvent::from_state(&state)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event": "state",
                "phase": "analyzing",
                "text": "Sample article A",
            })
        );
    }

    #[test]
    fn result_state_event_embeds_result() {
        let traces = ReasoningTraces {
            tone: "neutral".into(),
            consistency: "consistent".into(),
            manipulation: "none".into(),
        };
        let state = AnalysisState::Result(AnalysisResult::from_score(
            "Sample article A",
            1.0,
            0.5,
            traces,
            "stub",
        ));
        let json = serde_json::to_value(SessionEvent::from_state(&state)).unwrap();
        assert_eq!(json["phase"], "result");
        assert_eq!(json["result"]["verdict"], "REAL");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn error_state_event_reports_kind() {
        let state = AnalysisState::Error(EngineError::Timeout(Duration::from_secs(30)));
        let json = serde_json::to_value(SessionEvent::from_state(&state)).unwrap();
        assert_eq!(json["phase"], "error");
        assert_eq!(json["error"]["kind"], "timeout");
    }

    #[test]
    fn history_and_dropped_events_are_tagged() {
        let view = HistoryView::default();
        let json = serde_json::to_value(SessionEvent::from_view(&view)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "event": "history", "sequence": 0, "records": [] })
        );

        let json = serde_json::to_value(SessionEvent::Dropped { text: "again" }).unwrap();
        assert_eq!(json, serde_json::json!({ "event": "dropped", "text": "again" }));
    }
}
