//! HTTP scoring service client.
//!
//! Contract: `POST {url}` with `{"text": ...}` (bearer token optional); the
//! body of a 2xx answer is an `AnalysisResult` JSON object, which is checked
//! against the configured threshold before it is accepted. The result always
//! carries the submitted text, whatever the service echoes back.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;

use lens_core::engine::AnalysisEngine;
use lens_core::entities::AnalysisResult;
use lens_core::errors::EngineError;

use crate::error::RemoteError;
use crate::http::check_response;

#[derive(Serialize)]
struct ScoreRequest<'a> {
    text: &'a str,
}

pub struct RemoteEngine {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
    threshold: f64,
    timeout: Duration,
}

impl RemoteEngine {
    /// Create a client for the scoring service at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn new(
        url: &str,
        api_key: Option<&str>,
        threshold: f64,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("truthlens/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            url: url.to_string(),
            api_key: api_key.map(str::to_string),
            threshold,
            timeout,
        })
    }

    async fn request(&self, text: &str) -> Result<AnalysisResult, RemoteError> {
        let mut req = self.http.post(&self.url).json(&ScoreRequest { text });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = check_response(req.send().await?).await?;
        let body = resp.text().await?;
        let mut result: AnalysisResult =
            serde_json::from_str(&body).map_err(|e| RemoteError::Parse(e.to_string()))?;
        result
            .validate(self.threshold)
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        if result.source_text != text {
            tracing::debug!(
                returned_chars = result.source_text.chars().count(),
                "scoring service echoed different text; keeping the submitted text"
            );
            result.source_text = text.to_string();
        }
        if result.engine.is_empty() {
            result.engine = self.name().to_string();
        }
        Ok(result)
    }
}

#[async_trait]
impl AnalysisEngine for RemoteEngine {
    fn name(&self) -> &str {
        "remote"
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, EngineError> {
        let start = Instant::now();
        match self.request(text).await {
            Ok(result) if result.processing_time_ms == 0 => {
                let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                Ok(result.with_processing_time(elapsed))
            }
            Ok(result) => Ok(result),
            Err(error) => {
                tracing::debug!(%error, url = %self.url, "scoring service call failed");
                Err(error.into_engine_error(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_core::enums::EngineErrorKind;

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        let engine = RemoteEngine::new(
            "http://127.0.0.1:1/api/v1/analyze",
            None,
            0.5,
            Duration::from_secs(5),
        )
        .unwrap();
        let err = engine.analyze("text").await.unwrap_err();
        assert_eq!(err.kind(), EngineErrorKind::Unavailable);
    }
}
