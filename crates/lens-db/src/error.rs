//! Database error types for lens-db.

use lens_core::errors::StoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A record was rejected before reaching the database.
    #[error("Invalid record: {0}")]
    Validation(String),

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<DatabaseError> for StoreError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::Validation(msg) => Self::Validation(msg),
            DatabaseError::LibSql(e) => classify_libsql_error(&e),
            other => Self::Backend(other.to_string()),
        }
    }
}

/// Sort a libSQL error into the store error classes.
///
/// libSQL surfaces remote (Hrana) failures as strings, so the match is on
/// message text. Anything unrecognized is a backend error.
fn classify_libsql_error(e: &libsql::Error) -> StoreError {
    let msg = e.to_string();
    let lower = msg.to_ascii_lowercase();
    if lower.contains("401")
        || lower.contains("403")
        || lower.contains("unauthorized")
        || lower.contains("forbidden")
        || lower.contains("auth")
    {
        StoreError::Auth(msg)
    } else if lower.contains("constraint") {
        StoreError::Validation(msg)
    } else if lower.contains("connect")
        || lower.contains("timed out")
        || lower.contains("dns")
        || lower.contains("stream")
    {
        StoreError::Connection(msg)
    } else {
        StoreError::Backend(msg)
    }
}
