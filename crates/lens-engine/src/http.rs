//! Response status checks for the remote scoring client.

use crate::error::RemoteError;

/// Check an HTTP response for error statuses.
///
/// Returns the response unchanged on success. 429 becomes
/// [`RemoteError::RateLimited`] (with `Retry-After`, falling back to 60 s),
/// any other non-success status becomes [`RemoteError::Api`].
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(RemoteError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        return Err(RemoteError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}
