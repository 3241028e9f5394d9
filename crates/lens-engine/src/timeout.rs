//! Upper bound on a single engine call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use lens_core::engine::AnalysisEngine;
use lens_core::entities::AnalysisResult;
use lens_core::errors::EngineError;

/// Wraps another engine; a call that outlives `limit` fails with
/// [`EngineError::Timeout`].
pub struct TimeoutEngine {
    inner: Arc<dyn AnalysisEngine>,
    limit: Duration,
}

impl TimeoutEngine {
    #[must_use]
    pub fn new(inner: Arc<dyn AnalysisEngine>, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl AnalysisEngine for TimeoutEngine {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, EngineError> {
        if let Ok(outcome) = tokio::time::timeout(self.limit, self.inner.analyze(text)).await {
            outcome
        } else {
            tracing::warn!(
                engine = self.inner.name(),
                limit_ms = u64::try_from(self.limit.as_millis()).unwrap_or(u64::MAX),
                "analysis timed out"
            );
            Err(EngineError::Timeout(self.limit))
        }
    }
}
