//! Analysis request handler.
//!
//! `submit` is synchronous: it validates the text, takes the
//! `idle | result | error → analyzing` transition atomically on the state
//! channel, and spawns the engine call. A second submission while one is in
//! flight is dropped, not queued.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

use lens_core::engine::AnalysisEngine;
use lens_core::entities::{AnalysisRequest, AnalysisResult};
use lens_core::errors::EngineError;

use crate::history::{HistorySynchronizer, SyncOutcome};
use crate::state::AnalysisState;

/// Why a submission was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Text was empty or whitespace-only.
    BlankInput,
    /// Another submission is still being analyzed.
    Busy,
}

#[derive(Debug)]
pub enum Submission {
    Accepted(PendingAnalysis),
    Rejected(RejectReason),
}

impl Submission {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// An accepted submission whose engine call is running in the background.
#[derive(Debug)]
pub struct PendingAnalysis {
    handle: JoinHandle<Result<AnalysisResult, EngineError>>,
}

impl PendingAnalysis {
    /// Wait for the engine outcome. The state has already moved to `Result`
    /// or `Error` when this returns.
    ///
    /// # Errors
    ///
    /// Returns the engine's [`EngineError`], or `EngineError::Unavailable` if
    /// the analysis task itself died.
    pub async fn outcome(self) -> Result<AnalysisResult, EngineError> {
        self.handle
            .await
            .map_err(|e| EngineError::Unavailable(format!("analysis task failed: {e}")))?
    }
}

struct Inner {
    engine: Arc<dyn AnalysisEngine>,
    history: Arc<HistorySynchronizer>,
    state: watch::Sender<AnalysisState>,
    syncs: Mutex<JoinSet<SyncOutcome>>,
}

impl Inner {
    fn finish(&self, next: AnalysisState) {
        self.state.send_modify(|state| {
            if let Err(error) = state.transition(next) {
                tracing::error!(%error, "analysis state transition rejected");
            }
        });
    }

    fn syncs(&self) -> MutexGuard<'_, JoinSet<SyncOutcome>> {
        self.syncs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand `result` to the synchronizer without waiting for it.
    fn spawn_sync(&self, result: AnalysisResult) {
        let history = Arc::clone(&self.history);
        let mut syncs = self.syncs();
        while syncs.try_join_next().is_some() {}
        syncs.spawn(async move { history.on_result(&result).await });
    }
}

/// One engine call. Dropping it before an outcome was recorded (panic or
/// abort) moves the state to `Error`, so the handler never stays busy.
struct InFlight {
    inner: Arc<Inner>,
    completed: bool,
}

impl InFlight {
    async fn run(mut self, text: String) -> Result<AnalysisResult, EngineError> {
        let outcome = self.inner.engine.analyze(&text).await;
        self.completed = true;
        match &outcome {
            Ok(result) => {
                tracing::info!(
                    verdict = %result.verdict,
                    score = result.score,
                    engine = %result.engine,
                    elapsed_ms = result.processing_time_ms,
                    "analysis complete"
                );
                self.inner.finish(AnalysisState::Result(result.clone()));
                self.inner.spawn_sync(result.clone());
            }
            Err(error) => {
                tracing::warn!(%error, kind = %error.kind(), "analysis failed");
                self.inner.finish(AnalysisState::Error(error.clone()));
            }
        }
        outcome
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.completed {
            self.inner.finish(AnalysisState::Error(EngineError::Unavailable(
                "analysis ended without an outcome".into(),
            )));
        }
    }
}

/// Accepts submissions and owns the observable [`AnalysisState`].
///
/// Cheap to clone; clones share the same state and history.
#[derive(Clone)]
pub struct AnalysisHandler {
    inner: Arc<Inner>,
}

impl AnalysisHandler {
    #[must_use]
    pub fn new(engine: Arc<dyn AnalysisEngine>, history: Arc<HistorySynchronizer>) -> Self {
        let (state, _) = watch::channel(AnalysisState::Idle);
        Self {
            inner: Arc::new(Inner {
                engine,
                history,
                state,
                syncs: Mutex::new(JoinSet::new()),
            }),
        }
    }

    #[must_use]
    pub fn state(&self) -> AnalysisState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn history(&self) -> &Arc<HistorySynchronizer> {
        &self.inner.history
    }

    /// Submit `text` for analysis.
    ///
    /// Blank text, or any text while another submission is analyzing, is
    /// rejected without touching the state or calling the engine.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn submit(&self, text: &str) -> Submission {
        let Ok(request) = AnalysisRequest::new(text) else {
            tracing::debug!("blank submission ignored");
            return Submission::Rejected(RejectReason::BlankInput);
        };

        let accepted = self.inner.state.send_if_modified(|state| {
            state
                .transition(AnalysisState::Analyzing {
                    text: request.text.clone(),
                })
                .is_ok()
        });
        if !accepted {
            tracing::debug!("submission dropped, analysis already in flight");
            return Submission::Rejected(RejectReason::Busy);
        }

        tracing::info!(
            chars = request.text.chars().count(),
            engine = self.inner.engine.name(),
            "analysis submitted"
        );
        let in_flight = InFlight {
            inner: Arc::clone(&self.inner),
            completed: false,
        };
        let handle = tokio::spawn(in_flight.run(request.text));
        Submission::Accepted(PendingAnalysis { handle })
    }

    /// Wait for every history sync that has not been collected yet.
    pub async fn settle(&self) -> Vec<SyncOutcome> {
        let mut pending = std::mem::take(&mut *self.inner.syncs());
        let mut outcomes = Vec::with_capacity(pending.len());
        while let Some(joined) = pending.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => tracing::warn!(%error, "history sync task failed"),
            }
        }
        outcomes
    }
}
