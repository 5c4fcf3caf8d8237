//! Checkmate Storage Layer
//!
//! Implements the ClaimStore trait on SQLite.
//!
//! # Architecture
//!
//! - SQLite for fact-check records (`schema.sql`)
//! - An r2d2 [`ConnectionPool`] owned by the store; every operation
//!   checks out one connection, runs one transaction and returns it
//! - Lifecycle rules (pending → completed | error, once) enforced inside the
//!   update transaction
//!
//! # Examples
//!
//! ```no_run
//! use checkmate_store::SqliteStore;
//! use checkmate_domain::ClaimStore;
//!
//! let store = SqliteStore::new("checkmate.db").unwrap();
//! let id = store.create("The Earth is round.").unwrap();
//! let record = store.get_by_id(id).unwrap();
//! assert!(record.is_some());
//! ```

#![warn(missing_docs)]

pub mod pool;

pub use pool::{ConnectionPool, PoolConfig, PoolStatus, SqliteConnection};

use checkmate_domain::{CheckStatus, ClaimStore, FactCheckId, FactCheckRecord, Resolution};
use rusqlite::{params, OptionalExtension, Row};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error (includes constraint violations)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Fact check not found: {0}")]
    NotFound(FactCheckId),

    /// Requested status change breaks the record lifecycle
    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// No connection became free in time
    #[error("Connection pool exhausted after waiting {0:?}")]
    PoolExhausted(Duration),

    /// The pool could not be built
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

const RECORD_COLUMNS: &str =
    "id, claim, status, result, source_url, analysis, created_at, updated_at";

/// SQLite-based implementation of ClaimStore
///
/// # Thread Safety
///
/// The store is `Send + Sync`; concurrent callers each check out their own
/// pooled connection. SQLite serializes writers, and every write runs in an
/// immediate transaction so a record's row is never modified by two
/// transactions at once.
pub struct SqliteStore {
    pool: ConnectionPool,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::with_pool_config(path, PoolConfig::default())
    }

    /// Create a store with explicit pool settings
    pub fn with_pool_config<P: AsRef<Path>>(
        path: P,
        config: PoolConfig,
    ) -> Result<Self, StoreError> {
        let pool = ConnectionPool::open(path, config)?;
        let store = Self { pool };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    /// The pool backing this store
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.pool.with_transaction(|tx| {
            tx.execute_batch(schema)?;
            Ok(())
        })
    }

    /// Map a row selected with [`RECORD_COLUMNS`]
    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<FactCheckRecord> {
        let status_str: String = row.get(2)?;
        let status = status_str.parse::<CheckStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(e)),
            )
        })?;

        Ok(FactCheckRecord {
            id: FactCheckId::from_value(row.get(0)?),
            claim: row.get(1)?,
            status,
            result: row.get(3)?,
            source_url: row.get(4)?,
            analysis: row.get(5)?,
            created_at: row.get::<_, i64>(6)? as u64,
            updated_at: row.get::<_, i64>(7)? as u64,
        })
    }
}

/// Milliseconds since the Unix epoch
fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

impl ClaimStore for SqliteStore {
    type Error = StoreError;

    fn create(&self, claim: &str) -> Result<FactCheckId, Self::Error> {
        let now = now_millis();

        let id = self
            .pool
            .with_transaction(|tx| {
                tx.execute(
                    "INSERT INTO fact_checks (claim, status, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?3)",
                    params![claim, CheckStatus::Pending.as_str(), now],
                )?;
                Ok(FactCheckId::from_value(tx.last_insert_rowid()))
            })
            .inspect_err(|e| warn!("Failed to create fact check: {}", e))?;

        info!(id = %id, "Fact check created");
        Ok(id)
    }

    fn update(&self, id: FactCheckId, resolution: &Resolution) -> Result<(), Self::Error> {
        if !resolution.status.is_terminal() {
            return Err(StoreError::InvalidTransition(format!(
                "cannot resolve fact check {} to '{}'",
                id, resolution.status
            )));
        }

        self.pool.with_transaction(|tx| {
            let current: Option<String> = tx
                .query_row(
                    "SELECT status FROM fact_checks WHERE id = ?1",
                    params![id.value()],
                    |row| row.get(0),
                )
                .optional()?;

            let current = match current {
                Some(status) => status
                    .parse::<CheckStatus>()
                    .map_err(StoreError::InvalidData)?,
                None => {
                    warn!(id = %id, "Fact check not found");
                    return Err(StoreError::NotFound(id));
                }
            };

            if !current.can_transition_to(resolution.status) {
                return Err(StoreError::InvalidTransition(format!(
                    "fact check {} is already '{}'",
                    id, current
                )));
            }

            tx.execute(
                "UPDATE fact_checks
                 SET status = ?2, result = ?3, analysis = ?4,
                     source_url = COALESCE(?5, source_url),
                     updated_at = MAX(?6, created_at)
                 WHERE id = ?1",
                params![
                    id.value(),
                    resolution.status.as_str(),
                    &resolution.result,
                    &resolution.analysis,
                    resolution.source_url.as_deref(),
                    now_millis(),
                ],
            )?;
            Ok(())
        })?;

        info!(id = %id, status = %resolution.status, "Fact check updated");
        Ok(())
    }

    fn get_by_id(&self, id: FactCheckId) -> Result<Option<FactCheckRecord>, Self::Error> {
        let sql = format!("SELECT {} FROM fact_checks WHERE id = ?1", RECORD_COLUMNS);

        let record = self.pool.with_transaction(|tx| {
            Ok(tx
                .query_row(&sql, params![id.value()], Self::row_to_record)
                .optional()?)
        })?;

        debug!(id = %id, found = record.is_some(), "Fact check lookup");
        Ok(record)
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<FactCheckRecord>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM fact_checks ORDER BY created_at DESC, id DESC LIMIT ?1",
            RECORD_COLUMNS
        );

        self.pool.with_transaction(|tx| {
            let mut stmt = tx.prepare(&sql)?;
            let records = stmt
                .query_map(params![limit as i64], Self::row_to_record)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        })
    }
}
