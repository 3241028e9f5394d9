//! JSON shapes shared with the remote scoring service and the CLI output.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use lens_core::entities::{AnalysisResult, HistoryRecord, ReasoningTraces};
use lens_core::enums::{AnalysisPhase, EngineErrorKind, Verdict};

fn traces() -> ReasoningTraces {
    ReasoningTraces {
        tone: "Neutral reporting tone.".into(),
        consistency: "Matches reference sources.".into(),
        manipulation: "No manipulative emotionality.".into(),
    }
}

#[test]
fn analysis_result_wire_shape() {
    let result = AnalysisResult::from_score("Sample article A", 1.0, 0.5, traces(), "stub")
        .with_processing_time(1500);
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(
        value,
        json!({
            "source_text": "Sample article A",
            "verdict": "REAL",
            "score": 1.0,
            "reasoning": [
                "Neutral reporting tone.",
                "Matches reference sources.",
                "No manipulative emotionality."
            ],
            "reasoning_traces": {
                "tone": "Neutral reporting tone.",
                "consistency": "Matches reference sources.",
                "manipulation": "No manipulative emotionality."
            },
            "engine": "stub",
            "processing_time_ms": 1500
        })
    );
}

#[test]
fn history_record_wire_shape() {
    let record = HistoryRecord {
        id: "his-0a1b2c3d".into(),
        text: "Sample article A".into(),
        result: Verdict::Real,
        confidence: 100.0,
        reasoning_traces: traces().to_json().unwrap(),
        created_at: Utc.with_ymd_and_hms(2026, 2, 9, 14, 30, 0).unwrap(),
    };
    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["id"], "his-0a1b2c3d");
    assert_eq!(value["result"], "REAL");
    assert_eq!(value["confidence"], 100.0);
    assert_eq!(value["created_at"], "2026-02-09T14:30:00Z");
    assert_eq!(record.traces().unwrap(), traces());
}

#[test]
fn enum_strings_match_display() {
    for phase in [
        AnalysisPhase::Idle,
        AnalysisPhase::Analyzing,
        AnalysisPhase::Result,
        AnalysisPhase::Error,
    ] {
        let json = serde_json::to_value(phase).unwrap();
        assert_eq!(json, phase.to_string());
    }
    for kind in [
        EngineErrorKind::Unavailable,
        EngineErrorKind::Timeout,
        EngineErrorKind::InvalidResponse,
    ] {
        let json = serde_json::to_value(kind).unwrap();
        assert_eq!(json, kind.to_string());
    }
}
