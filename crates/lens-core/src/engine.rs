//! The analysis engine contract.
//!
//! The submission flow only ever sees `dyn AnalysisEngine`, so the fixed-output
//! stub, the heuristic analyzer and a remote scoring service are interchangeable.

use async_trait::async_trait;

use crate::entities::AnalysisResult;
use crate::errors::EngineError;

/// Produces an [`AnalysisResult`] for a piece of text.
///
/// `text` is already trimmed and non-blank when the request handler calls this.
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Short engine identifier recorded on every result (e.g. `"stub"`).
    fn name(&self) -> &str;

    /// Analyze `text`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the engine is unreachable, too slow, or
    /// answers with an invalid result.
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, EngineError>;
}
