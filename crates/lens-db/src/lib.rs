//! # lens-db
//!
//! libSQL history store for TruthLens.
//!
//! Holds the append-only `analysis_history` log and answers the
//! query-by-recency the history view is built from. The same code runs
//! against a local file, an in-memory database (tests), a Turso database
//! over the network, or a Turso embedded replica.
//!
//! [`HistoryDb`] implements [`lens_core::store::HistoryStore`]; callers are
//! expected to hold it as `Arc<dyn HistoryStore>`.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

use error::DatabaseError;
use libsql::Builder;

/// How the database handle reaches its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Local file or `:memory:`.
    Local,
    /// Turso over the network.
    Remote,
    /// Local file kept in sync with a Turso primary.
    Replica,
}

/// Database handle for the analysis history.
pub struct HistoryDb {
    db: libsql::Database,
    conn: libsql::Connection,
    mode: StoreMode,
}

impl HistoryDb {
    /// Open a local-only database at the given path (no cloud sync).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        Self::init(db, StoreMode::Local).await
    }

    /// Open a Turso database over the network.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be built or
    /// migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        Self::init(db, StoreMode::Remote).await
    }

    /// Open an embedded replica at `local_replica_path` synced with `url`.
    ///
    /// Pulls the remote state once before running migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the replica cannot be built, the initial
    /// sync fails, or migrations fail.
    pub async fn open_synced(
        local_replica_path: &str,
        url: &str,
        auth_token: &str,
    ) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote_replica(
            local_replica_path,
            url.to_string(),
            auth_token.to_string(),
        )
        .read_your_writes(true)
        .build()
        .await?;
        db.sync().await?;
        Self::init(db, StoreMode::Replica).await
    }

    async fn init(db: libsql::Database, mode: StoreMode) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;
        let history_db = Self { db, conn, mode };
        history_db.run_migrations().await?;
        tracing::debug!(?mode, "history database opened");
        Ok(history_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub const fn mode(&self) -> StoreMode {
        self.mode
    }

    /// Returns whether this handle is a synced Turso replica.
    #[must_use]
    pub fn is_synced_replica(&self) -> bool {
        self.mode == StoreMode::Replica
    }

    /// Pull remote changes into the embedded replica. No-op otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the sync fails.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        if self.is_synced_replica() {
            self.db.sync().await?;
        }
        Ok(())
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"his-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
