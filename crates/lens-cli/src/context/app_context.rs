use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use lens_config::LensConfig;
use lens_core::engine::AnalysisEngine;
use lens_core::store::HistoryStore;
use lens_db::HistoryDb;
use lens_flow::{AnalysisHandler, HistorySynchronizer};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: LensConfig,
    pub store: Arc<dyn HistoryStore>,
    pub engine: Arc<dyn AnalysisEngine>,
}

impl AppContext {
    /// Open the history store and build the configured engine.
    pub async fn init(config: LensConfig) -> anyhow::Result<Self> {
        let store = open_store(&config).await?;
        let engine = lens_engine::from_config(&config.engine)
            .context("failed to build analysis engine")?;

        Ok(Self {
            config,
            store,
            engine,
        })
    }

    /// A history synchronizer over the shared store, sized by `history.limit`.
    #[must_use]
    pub fn history(&self) -> Arc<HistorySynchronizer> {
        Arc::new(HistorySynchronizer::new(
            Arc::clone(&self.store),
            self.config.history.limit,
        ))
    }

    /// A request handler wired to the engine and a fresh synchronizer.
    #[must_use]
    pub fn handler(&self) -> AnalysisHandler {
        AnalysisHandler::new(Arc::clone(&self.engine), self.history())
    }
}

async fn open_store(config: &LensConfig) -> anyhow::Result<Arc<dyn HistoryStore>> {
    if config.turso.is_configured() {
        let remote = if config.turso.has_local_replica() {
            HistoryDb::open_synced(
                &config.turso.local_replica_path,
                &config.turso.url,
                &config.turso.auth_token,
            )
            .await
        } else {
            HistoryDb::open_remote(&config.turso.url, &config.turso.auth_token).await
        };

        match remote {
            Ok(db) => {
                tracing::debug!(url = %config.turso.url, mode = ?db.mode(), "using Turso history store");
                return Ok(Arc::new(db));
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    "failed to open Turso history store; falling back to local"
                );
            }
        }
    }

    open_local(&config.history.local_path).await
}

async fn open_local(path: &str) -> anyhow::Result<Arc<dyn HistoryStore>> {
    if path != ":memory:"
        && let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let db = HistoryDb::open_local(path)
        .await
        .with_context(|| format!("failed to open history database at {path}"))?;
    Ok(Arc::new(db))
}
