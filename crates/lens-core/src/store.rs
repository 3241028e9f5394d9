//! The persistence client contract.
//!
//! An append-only log with query-by-recency. `insert` and `list` are two
//! independent fallible calls; no transaction spans them.

use async_trait::async_trait;

use crate::entities::{HistoryRecord, HistoryRecordInput};
use crate::errors::StoreError;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append `record` and return the id the store assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on connection, auth, validation or backend failure.
    async fn insert(&self, record: &HistoryRecordInput) -> Result<String, StoreError>;

    /// The `limit` most recent records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    async fn list(&self, limit: u32) -> Result<Vec<HistoryRecord>, StoreError>;
}
