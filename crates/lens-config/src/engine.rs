//! Analysis engine configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which engine backs `analyze`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// Fixed output after a fixed delay.
    #[default]
    Stub,
    /// Keyword heuristics, computed locally.
    Heuristic,
    /// HTTP scoring service at `remote_url`.
    Remote,
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stub => "stub",
            Self::Heuristic => "heuristic",
            Self::Remote => "remote",
        })
    }
}

const fn default_stub_delay_ms() -> u64 {
    1500
}

const fn default_threshold() -> f64 {
    0.5
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub mode: EngineMode,

    /// Simulated latency of the stub engine.
    #[serde(default = "default_stub_delay_ms")]
    pub stub_delay_ms: u64,

    /// Scores at or above this are `REAL`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Upper bound on a single `analyze` call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Scoring service endpoint (remote mode).
    #[serde(default)]
    pub remote_url: String,

    /// Bearer token for the scoring service (remote mode, optional).
    #[serde(default)]
    pub api_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::default(),
            stub_delay_ms: default_stub_delay_ms(),
            threshold: default_threshold(),
            timeout_secs: default_timeout_secs(),
            remote_url: String::new(),
            api_key: String::new(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn stub_delay(&self) -> Duration {
        Duration::from_millis(self.stub_delay_ms)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject values the engines cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a threshold outside `[0, 1]` or a
    /// zero timeout, and `ConfigError::NotConfigured` for remote mode without a URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidValue {
                field: "engine.threshold".into(),
                reason: format!("{} is outside [0, 1]", self.threshold),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.mode == EngineMode::Remote && self.remote_url.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "engine.remote_url".into(),
            });
        }
        Ok(())
    }
}
