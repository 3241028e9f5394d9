//! # lens-engine
//!
//! [`AnalysisEngine`] implementations for TruthLens.
//!
//! - [`stub::StubEngine`]: fixed `REAL` verdict after a fixed delay (default)
//! - [`heuristic::HeuristicEngine`]: keyword heuristics computed locally
//! - [`remote::RemoteEngine`]: HTTP scoring service
//!
//! [`from_config`] builds the configured engine wrapped in
//! [`timeout::TimeoutEngine`], so every call is bounded.

pub mod heuristic;
pub mod remote;
pub mod stub;
pub mod timeout;

mod error;
mod http;

pub use error::RemoteError;

use std::sync::Arc;

use lens_config::{EngineConfig, EngineMode};
use lens_core::engine::AnalysisEngine;

use crate::heuristic::HeuristicEngine;
use crate::remote::RemoteEngine;
use crate::stub::StubEngine;
use crate::timeout::TimeoutEngine;

/// Build the engine selected by `config.mode`, bounded by `config.timeout()`.
///
/// # Errors
///
/// Returns [`RemoteError`] if the HTTP client for remote mode cannot be built.
pub fn from_config(config: &EngineConfig) -> Result<Arc<dyn AnalysisEngine>, RemoteError> {
    let engine: Arc<dyn AnalysisEngine> = match config.mode {
        EngineMode::Stub => Arc::new(StubEngine::new(config.stub_delay(), config.threshold)),
        EngineMode::Heuristic => Arc::new(HeuristicEngine::new(config.threshold)),
        EngineMode::Remote => {
            let api_key = Some(config.api_key.as_str()).filter(|k| !k.is_empty());
            Arc::new(RemoteEngine::new(
                &config.remote_url,
                api_key,
                config.threshold,
                config.timeout(),
            )?)
        }
    };
    tracing::debug!(
        mode = %config.mode,
        threshold = config.threshold,
        timeout_secs = config.timeout_secs,
        "analysis engine configured"
    );
    Ok(Arc::new(TimeoutEngine::new(engine, config.timeout())))
}
