//! Fakes for exercising the flow without real services.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, oneshot};

use lens_core::engine::AnalysisEngine;
use lens_core::entities::{AnalysisResult, HistoryRecord, HistoryRecordInput, ReasoningTraces};
use lens_core::errors::{EngineError, StoreError};
use lens_core::store::HistoryStore;
use lens_db::HistoryDb;

pub(crate) async fn memory_store() -> Arc<dyn HistoryStore> {
    Arc::new(HistoryDb::open_local(":memory:").await.unwrap())
}

pub(crate) fn traces() -> ReasoningTraces {
    ReasoningTraces {
        tone: "Neutral reporting tone.".into(),
        consistency: "Consistent with reference sources.".into(),
        manipulation: "No manipulative emotionality.".into(),
    }
}

pub(crate) fn result_for(text: &str) -> AnalysisResult {
    AnalysisResult::from_score(text, 1.0, 0.5, traces(), "test")
}

/// Delegates to `inner`, failing the insert calls whose 1-based number is
/// listed, or every list call.
pub(crate) struct FlakyStore {
    inner: Arc<dyn HistoryStore>,
    failing_inserts: HashSet<usize>,
    fail_lists: bool,
    inserts: AtomicUsize,
}

impl FlakyStore {
    pub(crate) fn failing_inserts(inner: Arc<dyn HistoryStore>, calls: &[usize]) -> Self {
        Self {
            inner,
            failing_inserts: calls.iter().copied().collect(),
            fail_lists: false,
            inserts: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing_lists(inner: Arc<dyn HistoryStore>) -> Self {
        Self {
            inner,
            failing_inserts: HashSet::new(),
            fail_lists: true,
            inserts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl HistoryStore for FlakyStore {
    async fn insert(&self, record: &HistoryRecordInput) -> Result<String, StoreError> {
        let call = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing_inserts.contains(&call) {
            return Err(StoreError::Connection(format!("insert {call} dropped")));
        }
        self.inner.insert(record).await
    }

    async fn list(&self, limit: u32) -> Result<Vec<HistoryRecord>, StoreError> {
        if self.fail_lists {
            return Err(StoreError::Backend("list unavailable".into()));
        }
        self.inner.list(limit).await
    }
}

/// Each `list` call waits for its own gate, in call order.
pub(crate) struct GatedListStore {
    inner: Arc<dyn HistoryStore>,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
}

impl GatedListStore {
    pub(crate) fn new(
        inner: Arc<dyn HistoryStore>,
        calls: usize,
    ) -> (Self, Vec<oneshot::Sender<()>>) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) =
            (0..calls).map(|_| oneshot::channel()).unzip();
        let store = Self {
            inner,
            gates: Mutex::new(receivers),
        };
        (store, senders)
    }
}

#[async_trait]
impl HistoryStore for GatedListStore {
    async fn insert(&self, record: &HistoryRecordInput) -> Result<String, StoreError> {
        self.inner.insert(record).await
    }

    async fn list(&self, limit: u32) -> Result<Vec<HistoryRecord>, StoreError> {
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            gate.await.unwrap();
        }
        self.inner.list(limit).await
    }
}

/// Engine that holds every call until released, counting calls.
#[derive(Default)]
pub(crate) struct GatedEngine {
    release: Notify,
    calls: AtomicUsize,
}

impl GatedEngine {
    pub(crate) fn release(&self) {
        self.release.notify_one();
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisEngine for GatedEngine {
    fn name(&self) -> &str {
        "gated"
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(AnalysisResult::from_score(text, 1.0, 0.5, traces(), "gated"))
    }
}

/// Engine that always fails with `error`.
pub(crate) struct FailingEngine {
    pub(crate) error: EngineError,
}

#[async_trait]
impl AnalysisEngine for FailingEngine {
    fn name(&self) -> &str {
        "failing"
    }

    async fn analyze(&self, _text: &str) -> Result<AnalysisResult, EngineError> {
        Err(self.error.clone())
    }
}
