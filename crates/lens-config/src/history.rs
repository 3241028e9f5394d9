//! History view configuration.

use serde::{Deserialize, Serialize};

/// Number of records kept in the history view.
const fn default_limit() -> u32 {
    5
}

fn default_local_path() -> String {
    ".truthlens/history.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// How many of the most recent records the history view shows.
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Local libSQL file used when Turso is not configured.
    #[serde(default = "default_local_path")]
    pub local_path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            local_path: default_local_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = HistoryConfig::default();
        assert_eq!(config.limit, 5);
        assert_eq!(config.local_path, ".truthlens/history.db");
    }
}
