//! # lens-config
//!
//! Layered configuration loading for TruthLens using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TRUTHLENS_*` prefix, `__` as separator)
//! 2. Project-level `.truthlens/config.toml`
//! 3. User-level `~/.config/truthlens/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TRUTHLENS_TURSO__URL` -> `turso.url`,
//! `TRUTHLENS_ENGINE__MODE` -> `engine.mode`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use lens_config::LensConfig;
//!
//! let config = LensConfig::load_with_dotenv().expect("config");
//!
//! if config.turso.is_configured() {
//!     println!("history store: {}", config.turso.url);
//! }
//! ```

mod engine;
mod error;
mod history;
mod turso;

pub use engine::{EngineConfig, EngineMode};
pub use error::ConfigError;
pub use history::HistoryConfig;
pub use turso::TursoConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "TRUTHLENS_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LensConfig {
    #[serde(default)]
    pub turso: TursoConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl LensConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from the current directory (if any) before building the
    /// figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".truthlens/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Cross-section validation run after extraction.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unusable values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if self.history.limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history.limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("truthlens").join("config.toml"))
    }
}
