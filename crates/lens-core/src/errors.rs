//! Cross-cutting error types for TruthLens.
//!
//! `EngineError` and `StoreError` are the failure halves of the two external
//! contracts. Implementation crates keep their own richer errors
//! (e.g. `DatabaseError`) and convert at the trait boundary.

use std::time::Duration;

use thiserror::Error;

use crate::enums::EngineErrorKind;

/// Errors that can be raised by any TruthLens crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Data failed validation (format, ranges, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure of an analysis engine call.
///
/// Cloneable so it can live inside the observable state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine could not be reached or refused the request.
    #[error("analysis engine unavailable: {0}")]
    Unavailable(String),

    /// The engine did not answer within the configured bound.
    #[error("analysis engine timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The engine answered with something that is not a valid result.
    #[error("analysis engine returned an invalid response: {0}")]
    InvalidResponse(String),
}

impl EngineError {
    #[must_use]
    pub const fn kind(&self) -> EngineErrorKind {
        match self {
            Self::Unavailable(_) => EngineErrorKind::Unavailable,
            Self::Timeout(_) => EngineErrorKind::Timeout,
            Self::InvalidResponse(_) => EngineErrorKind::InvalidResponse,
        }
    }
}

/// Failure of a persistence client call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("history store connection failed: {0}")]
    Connection(String),

    /// The store rejected the credentials.
    #[error("history store authentication failed: {0}")]
    Auth(String),

    /// The record was rejected before or by the store.
    #[error("history record rejected: {0}")]
    Validation(String),

    /// Any other store-side failure.
    #[error("history store error: {0}")]
    Backend(String),
}
