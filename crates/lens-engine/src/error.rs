//! Remote scoring client errors.

use std::time::Duration;

use lens_core::errors::EngineError;
use thiserror::Error;

/// Errors from talking to the remote scoring service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The service returned 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// The response body is not a valid analysis result.
    #[error("parse error: {0}")]
    Parse(String),
}

impl RemoteError {
    /// Classify into the engine error kinds. `timeout` is the client bound
    /// reported when the transport timed out.
    #[must_use]
    pub fn into_engine_error(self, timeout: Duration) -> EngineError {
        match self {
            Self::Http(e) if e.is_timeout() => EngineError::Timeout(timeout),
            Self::Http(e) if e.is_decode() => EngineError::InvalidResponse(e.to_string()),
            Self::Parse(msg) => EngineError::InvalidResponse(msg),
            other => EngineError::Unavailable(other.to_string()),
        }
    }
}
