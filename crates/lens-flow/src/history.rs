//! History synchronization: persist each result, then republish the most
//! recent records.
//!
//! Every refresh takes a sequence number before it queries the store, and
//! its answer is only applied if no later refresh has been applied already.
//! Refreshes that complete out of order therefore never move the view
//! backwards.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::watch;

use lens_core::entities::{AnalysisResult, HistoryRecord, HistoryRecordInput};
use lens_core::errors::StoreError;
use lens_core::store::HistoryStore;

/// The most recent history records, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryView {
    /// Sequence number of the refresh that produced this view (0 before the
    /// first refresh).
    pub sequence: u64,
    pub records: Vec<HistoryRecord>,
}

impl HistoryView {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// What one sync cycle did to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The refresh was applied.
    Refreshed { sequence: u64 },
    /// A newer refresh was already applied; this one was discarded.
    Stale { sequence: u64 },
    /// The insert failed; the view was left as it was.
    PersistFailed,
    /// The list query failed; the view was left as it was.
    RefreshFailed,
}

/// Single writer of the [`HistoryView`].
pub struct HistorySynchronizer {
    store: Arc<dyn HistoryStore>,
    limit: u32,
    last_sequence: AtomicU64,
    view: watch::Sender<HistoryView>,
}

impl HistorySynchronizer {
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>, limit: u32) -> Self {
        let (view, _) = watch::channel(HistoryView::default());
        Self {
            store,
            limit,
            last_sequence: AtomicU64::new(0),
            view,
        }
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Snapshot of the current view.
    #[must_use]
    pub fn view(&self) -> HistoryView {
        self.view.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HistoryView> {
        self.view.subscribe()
    }

    /// Initial refresh, so previously stored records show up on startup.
    pub async fn load(&self) -> SyncOutcome {
        self.refresh().await
    }

    /// Persist `result`, then refresh. An insert failure is logged and the
    /// refresh for this cycle is skipped.
    pub async fn on_result(&self, result: &AnalysisResult) -> SyncOutcome {
        match self.persist(result).await {
            Ok(id) => {
                tracing::debug!(%id, verdict = %result.verdict, "analysis persisted");
                self.refresh().await
            }
            Err(error) => {
                tracing::warn!(%error, "history insert failed, view not refreshed");
                SyncOutcome::PersistFailed
            }
        }
    }

    /// Append `result` to the history log, stamped now.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the record cannot be built or the store
    /// rejects it.
    pub async fn persist(&self, result: &AnalysisResult) -> Result<String, StoreError> {
        let record = HistoryRecordInput::from_result(result, Utc::now())
            .map_err(|e| StoreError::Validation(e.to_string()))?;
        self.store.insert(&record).await
    }

    /// Re-query the most recent `limit` records and replace the view, unless
    /// a later refresh got there first.
    pub async fn refresh(&self) -> SyncOutcome {
        let sequence = self.last_sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let records = match self.store.list(self.limit).await {
            Ok(records) => records,
            Err(error) => {
                tracing::warn!(%error, sequence, "history refresh failed");
                return SyncOutcome::RefreshFailed;
            }
        };

        let applied = self.view.send_if_modified(|view| {
            if sequence > view.sequence {
                *view = HistoryView { sequence, records };
                true
            } else {
                false
            }
        });

        if applied {
            tracing::debug!(sequence, "history view refreshed");
            SyncOutcome::Refreshed { sequence }
        } else {
            tracing::debug!(sequence, "stale history refresh discarded");
            SyncOutcome::Stale { sequence }
        }
    }
}
