use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{AnalysisResult, ReasoningTraces};
use crate::enums::Verdict;
use crate::errors::CoreError;

/// A row to append to the history log. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecordInput {
    pub text: String,
    pub result: Verdict,
    /// `score * 100`, in `[0, 100]`.
    pub confidence: f64,
    /// JSON-encoded [`ReasoningTraces`].
    pub reasoning_traces: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryRecordInput {
    /// Build the persisted form of `result`, stamped with `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if the traces cannot be encoded.
    pub fn from_result(result: &AnalysisResult, created_at: DateTime<Utc>) -> Result<Self, CoreError> {
        Ok(Self {
            text: result.source_text.clone(),
            result: result.verdict,
            confidence: result.confidence_percent(),
            reasoning_traces: result.reasoning_traces.to_json()?,
            created_at,
        })
    }
}

/// A persisted, immutable history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub text: String,
    pub result: Verdict,
    pub confidence: f64,
    pub reasoning_traces: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Decode the stored reasoning traces.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the stored JSON is malformed.
    pub fn traces(&self) -> Result<ReasoningTraces, CoreError> {
        ReasoningTraces::from_json(&self.reasoning_traces)
    }
}
