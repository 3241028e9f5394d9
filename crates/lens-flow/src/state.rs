//! Observable analysis state.

use lens_core::entities::AnalysisResult;
use lens_core::enums::AnalysisPhase;
use lens_core::errors::{CoreError, EngineError};

/// Current state of the submission cycle, as published to observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnalysisState {
    #[default]
    Idle,
    /// The engine is working on `text`.
    Analyzing { text: String },
    Result(AnalysisResult),
    Error(EngineError),
}

impl AnalysisState {
    #[must_use]
    pub const fn phase(&self) -> AnalysisPhase {
        match self {
            Self::Idle => AnalysisPhase::Idle,
            Self::Analyzing { .. } => AnalysisPhase::Analyzing,
            Self::Result(_) => AnalysisPhase::Result,
            Self::Error(_) => AnalysisPhase::Error,
        }
    }

    #[must_use]
    pub const fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Result(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_analyzing(&self) -> bool {
        matches!(self, Self::Analyzing { .. })
    }

    /// Replace `self` with `next` if the phase machine allows the move.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` and leaves `self` untouched
    /// otherwise.
    pub fn transition(&mut self, next: Self) -> Result<(), CoreError> {
        let (from, to) = (self.phase(), next.phase());
        if !from.can_transition_to(to) {
            return Err(CoreError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        *self = next;
        Ok(())
    }
}
