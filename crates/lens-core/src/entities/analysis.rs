use serde::{Deserialize, Serialize};

use crate::enums::Verdict;
use crate::errors::CoreError;

/// A validated submission: the trimmed, non-blank input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
}

impl AnalysisRequest {
    /// Build a request from raw user input.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the text is empty or whitespace-only.
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(CoreError::Validation("analysis text is blank".into()));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }
}

/// Named reasoning fields. `AnalysisResult::reasoning` is derived from these,
/// one line per field, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningTraces {
    /// Tone of the reporting (neutral, emotional, ...).
    pub tone: String,
    /// Consistency with reference sources / framing.
    pub consistency: String,
    /// Presence or absence of manipulative techniques.
    pub manipulation: String,
}

impl ReasoningTraces {
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.tone.clone(),
            self.consistency.clone(),
            self.manipulation.clone(),
        ]
    }

    /// Encode as the JSON object stored in `analysis_history.reasoning_traces`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if serialization fails.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| CoreError::Other(e.into()))
    }

    /// Decode the stored JSON object.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `s` is not a traces object.
    pub fn from_json(s: &str) -> Result<Self, CoreError> {
        serde_json::from_str(s)
            .map_err(|e| CoreError::Validation(format!("invalid reasoning traces: {e}")))
    }

    fn has_blank_field(&self) -> bool {
        [&self.tone, &self.consistency, &self.manipulation]
            .iter()
            .any(|s| s.trim().is_empty())
    }
}

/// Structured outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub source_text: String,
    pub verdict: Verdict,
    /// Confidence in `[0, 1]`.
    pub score: f64,
    pub reasoning: Vec<String>,
    pub reasoning_traces: ReasoningTraces,
    /// Name of the engine that produced this result.
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub processing_time_ms: u64,
}

impl AnalysisResult {
    /// Build a result whose verdict is decided by `score` against `threshold`.
    ///
    /// The score is clamped into `[0, 1]` first.
    #[must_use]
    pub fn from_score(
        source_text: impl Into<String>,
        score: f64,
        threshold: f64,
        reasoning_traces: ReasoningTraces,
        engine: &str,
    ) -> Self {
        let score = score.clamp(0.0, 1.0);
        Self {
            source_text: source_text.into(),
            verdict: Verdict::from_score(score, threshold),
            score,
            reasoning: reasoning_traces.lines(),
            reasoning_traces,
            engine: engine.to_string(),
            processing_time_ms: 0,
        }
    }

    #[must_use]
    pub const fn with_processing_time(mut self, ms: u64) -> Self {
        self.processing_time_ms = ms;
        self
    }

    /// Confidence as a percentage in `[0, 100]`.
    #[must_use]
    pub fn confidence_percent(&self) -> f64 {
        self.score * 100.0
    }

    /// Check the result invariants against `threshold`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the score is outside `[0, 1]`, the
    /// reasoning is empty or does not match the traces line for line, a trace
    /// field is blank, or the verdict disagrees with the threshold.
    pub fn validate(&self, threshold: f64) -> Result<(), CoreError> {
        if !self.score.is_finite() || !(0.0..=1.0).contains(&self.score) {
            return Err(CoreError::Validation(format!(
                "score {} outside [0, 1]",
                self.score
            )));
        }
        if self.reasoning.is_empty() || self.reasoning.iter().all(|r| r.trim().is_empty()) {
            return Err(CoreError::Validation("reasoning is empty".into()));
        }
        if self.reasoning_traces.has_blank_field() {
            return Err(CoreError::Validation("reasoning trace field is blank".into()));
        }
        if self.reasoning != self.reasoning_traces.lines() {
            return Err(CoreError::Validation(
                "reasoning lines differ from the reasoning traces".into(),
            ));
        }
        let expected = Verdict::from_score(self.score, threshold);
        if self.verdict != expected {
            return Err(CoreError::Validation(format!(
                "verdict {} disagrees with score {} at threshold {threshold}",
                self.verdict, self.score
            )));
        }
        Ok(())
    }
}
