//! Analysis history repository: append and query-by-recency.

use async_trait::async_trait;

use lens_core::entities::{HistoryRecord, HistoryRecordInput, ReasoningTraces};
use lens_core::enums::Verdict;
use lens_core::errors::StoreError;
use lens_core::ids::PREFIX_HISTORY;
use lens_core::store::HistoryStore;

use crate::HistoryDb;
use crate::error::DatabaseError;
use crate::helpers::{format_timestamp, parse_datetime, parse_enum};

const SELECT_COLS: &str = "id, text, result, confidence, reasoning_traces, created_at";

fn row_to_record(row: &libsql::Row) -> Result<HistoryRecord, DatabaseError> {
    Ok(HistoryRecord {
        id: row.get(0)?,
        text: row.get(1)?,
        result: parse_enum::<Verdict>(&row.get::<String>(2)?)?,
        confidence: row.get::<f64>(3)?,
        reasoning_traces: row.get(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

/// Reject records the log should never contain.
fn validate_input(record: &HistoryRecordInput) -> Result<(), DatabaseError> {
    if record.text.trim().is_empty() {
        return Err(DatabaseError::Validation("text is blank".into()));
    }
    if !record.confidence.is_finite() || !(0.0..=100.0).contains(&record.confidence) {
        return Err(DatabaseError::Validation(format!(
            "confidence {} outside [0, 100]",
            record.confidence
        )));
    }
    ReasoningTraces::from_json(&record.reasoning_traces)
        .map_err(|e| DatabaseError::Validation(e.to_string()))?;
    Ok(())
}

impl HistoryDb {
    /// Append one analysis to the log and return its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for a malformed record, or
    /// `DatabaseError` if the insert fails.
    pub async fn insert_record(&self, record: &HistoryRecordInput) -> Result<String, DatabaseError> {
        validate_input(record)?;
        let id = self.generate_id(PREFIX_HISTORY).await?;

        self.conn()
            .execute(
                "INSERT INTO analysis_history (id, text, result, confidence, reasoning_traces, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    id.as_str(),
                    record.text.as_str(),
                    record.result.as_str(),
                    record.confidence,
                    record.reasoning_traces.as_str(),
                    format_timestamp(&record.created_at)
                ],
            )
            .await?;

        if let Err(error) = self.sync().await {
            // The write already reached the primary; only the local copy lags.
            tracing::warn!(%error, id = %id, "replica sync after insert failed");
        }

        tracing::debug!(id = %id, result = %record.result, "history record inserted");
        Ok(id)
    }

    /// Fetch one record by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no record has this id.
    pub async fn get_record(&self, id: &str) -> Result<HistoryRecord, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM analysis_history WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_record(&row)
    }

    /// The `limit` most recent records, newest first.
    ///
    /// Ties on `created_at` go to the later insert.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or row parsing fails.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryRecord>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM analysis_history ORDER BY created_at DESC, rowid DESC LIMIT ?1"
                ),
                [i64::from(limit)],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_record(&row)?);
        }
        Ok(records)
    }

    /// Total number of records in the log.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_records(&self) -> Result<u64, DatabaseError> {
        let mut rows = self
            .conn()
            .query("SELECT COUNT(*) FROM analysis_history", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count = row.get::<i64>(0)?;
        u64::try_from(count).map_err(|e| DatabaseError::InvalidState(e.to_string()))
    }
}

#[async_trait]
impl HistoryStore for HistoryDb {
    async fn insert(&self, record: &HistoryRecordInput) -> Result<String, StoreError> {
        Ok(self.insert_record(record).await?)
    }

    async fn list(&self, limit: u32) -> Result<Vec<HistoryRecord>, StoreError> {
        Ok(self.list_recent(limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    async fn test_db() -> HistoryDb {
        HistoryDb::open_local(":memory:").await.unwrap()
    }

    fn input(text: &str, verdict: Verdict, confidence: f64) -> HistoryRecordInput {
        HistoryRecordInput {
            text: text.to_string(),
            result: verdict,
            confidence,
            reasoning_traces: ReasoningTraces {
                tone: "tone".into(),
                consistency: "consistency".into(),
                manipulation: "manipulation".into(),
            }
            .to_json()
            .unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_get_roundtrip() {
        let db = test_db().await;
        let record = input("Sample article A", Verdict::Real, 100.0);

        let id = db.insert_record(&record).await.unwrap();
        assert!(id.starts_with("his-"));

        let fetched = db.get_record(&id).await.unwrap();
        assert_eq!(fetched.text, record.text);
        assert_eq!(fetched.result, Verdict::Real);
        assert!((fetched.confidence - 100.0).abs() < 1e-9);
        assert_eq!(fetched.reasoning_traces, record.reasoning_traces);
        assert_eq!(fetched.created_at, record.created_at);
    }

    #[tokio::test]
    async fn get_missing_record() {
        let db = test_db().await;
        let result = db.get_record("his-00000000").await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn list_recent_orders_newest_first_and_limits() {
        let db = test_db().await;
        let base = Utc::now();
        for i in 0..7 {
            let mut record = input(&format!("article {i}"), Verdict::Fake, 10.0);
            record.created_at = base + Duration::seconds(i);
            db.insert_record(&record).await.unwrap();
        }

        let recent = db.list_recent(5).await.unwrap();
        let texts: Vec<&str> = recent.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["article 6", "article 5", "article 4", "article 3", "article 2"]
        );
        assert_eq!(db.count_records().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn list_recent_breaks_ties_by_insert_order() {
        let db = test_db().await;
        let ts = Utc::now();
        for text in ["first", "second"] {
            let mut record = input(text, Verdict::Real, 90.0);
            record.created_at = ts;
            db.insert_record(&record).await.unwrap();
        }

        let recent = db.list_recent(5).await.unwrap();
        assert_eq!(recent[0].text, "second");
        assert_eq!(recent[1].text, "first");
    }

    #[tokio::test]
    async fn list_recent_on_empty_log() {
        let db = test_db().await;
        assert!(db.list_recent(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_rejects_invalid_records() {
        let db = test_db().await;

        let blank = input("   ", Verdict::Real, 50.0);
        assert!(matches!(
            db.insert_record(&blank).await,
            Err(DatabaseError::Validation(_))
        ));

        let out_of_range = input("text", Verdict::Real, 100.5);
        assert!(matches!(
            db.insert_record(&out_of_range).await,
            Err(DatabaseError::Validation(_))
        ));

        let mut bad_traces = input("text", Verdict::Real, 50.0);
        bad_traces.reasoning_traces = "not json".into();
        assert!(matches!(
            db.insert_record(&bad_traces).await,
            Err(DatabaseError::Validation(_))
        ));

        assert_eq!(db.count_records().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn store_trait_maps_validation_errors() {
        let db = test_db().await;
        let store: &dyn HistoryStore = &db;
        let err = store
            .insert(&input("", Verdict::Fake, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
