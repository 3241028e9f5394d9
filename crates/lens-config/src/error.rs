//! Errors raised while loading or validating `LensConfig`.

use thiserror::Error;

use crate::ENV_PREFIX;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `TRUTHLENS_*` variable could not be parsed.
    #[error("failed to load truthlens config: {0}")]
    Figment(#[from] figment::Error),

    /// A setting the selected mode depends on is empty. `section` is the
    /// dotted key, e.g. `engine.remote_url`.
    #[error(
        "{section} is required but not set (add it to .truthlens/config.toml or set {})",
        env_var(.section)
    )]
    NotConfigured { section: String },

    /// A `turso`, `engine` or `history` value is out of range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Environment variable that overrides a dotted config key.
fn env_var(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.replace('.', "__").to_ascii_uppercase())
}
