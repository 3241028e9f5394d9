//! Verdicts, analysis phases, and engine error kinds.
//!
//! `AnalysisPhase` is the state machine of a submission cycle. It provides
//! `allowed_next_states()` so the submission guard is a property of the
//! phase, not an ad-hoc boolean.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Binary outcome of an analysis.
///
/// Stored and serialized as the upper-case strings `REAL` / `FAKE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Real,
    Fake,
}

impl Verdict {
    /// Decide the verdict for `score` against `threshold` (`REAL` iff `score >= threshold`).
    #[must_use]
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            Self::Real
        } else {
            Self::Fake
        }
    }

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Real => "REAL",
            Self::Fake => "FAKE",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REAL" => Ok(Self::Real),
            "FAKE" => Ok(Self::Fake),
            other => Err(CoreError::Validation(format!("unknown verdict '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisPhase
// ---------------------------------------------------------------------------

/// Phase of the observable analysis state.
///
/// ```text
/// idle → analyzing → result → analyzing → ...
///                  → error  → analyzing → ...
/// ```
///
/// A submission is only accepted from a phase that may move to `analyzing`.
/// Submitting while `analyzing` is a self-loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    Idle,
    Analyzing,
    Result,
    Error,
}

impl AnalysisPhase {
    /// Valid next phases from the current phase.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Analyzing],
            Self::Analyzing => &[Self::Result, Self::Error],
            Self::Result => &[Self::Analyzing],
            Self::Error => &[Self::Analyzing],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether a new submission may start from this phase.
    #[must_use]
    pub fn accepts_submission(self) -> bool {
        self.can_transition_to(Self::Analyzing)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Result => "result",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EngineErrorKind
// ---------------------------------------------------------------------------

/// Classification of an analysis engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineErrorKind {
    Unavailable,
    Timeout,
    InvalidResponse,
}

impl EngineErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Timeout => "timeout",
            Self::InvalidResponse => "invalid_response",
        }
    }
}

impl fmt::Display for EngineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1.0, 0.5, Verdict::Real)]
    #[case(0.5, 0.5, Verdict::Real)]
    #[case(0.499, 0.5, Verdict::Fake)]
    #[case(0.0, 0.0, Verdict::Real)]
    #[case(0.99, 1.0, Verdict::Fake)]
    fn verdict_follows_threshold(#[case] score: f64, #[case] threshold: f64, #[case] expected: Verdict) {
        assert_eq!(Verdict::from_score(score, threshold), expected);
    }

    #[test]
    fn verdict_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Verdict::Real).unwrap(), "\"REAL\"");
        assert_eq!(serde_json::to_string(&Verdict::Fake).unwrap(), "\"FAKE\"");
        assert_eq!("FAKE".parse::<Verdict>().unwrap(), Verdict::Fake);
        assert!("real".parse::<Verdict>().is_err());
    }

    #[test]
    fn analyzing_rejects_submission() {
        assert!(AnalysisPhase::Idle.accepts_submission());
        assert!(AnalysisPhase::Result.accepts_submission());
        assert!(AnalysisPhase::Error.accepts_submission());
        assert!(!AnalysisPhase::Analyzing.accepts_submission());
    }

    #[test]
    fn only_analyzing_completes() {
        assert!(AnalysisPhase::Analyzing.can_transition_to(AnalysisPhase::Result));
        assert!(AnalysisPhase::Analyzing.can_transition_to(AnalysisPhase::Error));
        assert!(!AnalysisPhase::Idle.can_transition_to(AnalysisPhase::Result));
        assert!(!AnalysisPhase::Result.can_transition_to(AnalysisPhase::Error));
        assert!(!AnalysisPhase::Result.can_transition_to(AnalysisPhase::Idle));
    }
}
