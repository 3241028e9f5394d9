//! Turso/libSQL configuration for the remote history store.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TursoConfig {
    /// Database URL (e.g., `libsql://truthlens-myorg.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Database auth token.
    #[serde(default)]
    pub auth_token: String,

    /// Local replica path for embedded replica mode. Empty means talk to the
    /// remote directly.
    #[serde(default)]
    pub local_replica_path: String,
}

impl TursoConfig {
    /// Check if the Turso config has the minimum required fields for remote access.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Check if embedded replica mode is enabled.
    #[must_use]
    pub fn has_local_replica(&self) -> bool {
        !self.local_replica_path.is_empty()
    }
}
