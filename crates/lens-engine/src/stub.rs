//! Fixed-output engine.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use lens_core::engine::AnalysisEngine;
use lens_core::entities::{AnalysisResult, ReasoningTraces};
use lens_core::errors::EngineError;

/// Waits `delay`, then answers `REAL` with score 1.0 and the same three
/// reasoning lines for any input.
#[derive(Debug, Clone)]
pub struct StubEngine {
    delay: Duration,
    threshold: f64,
}

impl StubEngine {
    #[must_use]
    pub const fn new(delay: Duration, threshold: f64) -> Self {
        Self { delay, threshold }
    }

    fn traces() -> ReasoningTraces {
        ReasoningTraces {
            tone: "Contextual analysis confirms a neutral reporting tone.".into(),
            consistency: "Semantic correspondence with sources is 98.5%.".into(),
            manipulation: "No signs of manipulative emotionality.".into(),
        }
    }
}

#[async_trait]
impl AnalysisEngine for StubEngine {
    fn name(&self) -> &str {
        "stub"
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, EngineError> {
        let start = Instant::now();
        tokio::time::sleep(self.delay).await;
        let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ok(
            AnalysisResult::from_score(text, 1.0, self.threshold, Self::traces(), self.name())
                .with_processing_time(elapsed),
        )
    }
}
