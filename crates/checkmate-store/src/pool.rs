//! SQLite connection pool with scoped acquisition
//!
//! Thin layer over `r2d2`. A caller holds a connection only for the
//! lifetime of the checked-out guard, which returns it on drop, so release
//! happens on every exit path including early returns and panics.

use crate::StoreError;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of pooled connections
pub const DEFAULT_MAX_SIZE: usize = 4;

/// Default time to wait for a free connection
pub const DEFAULT_ACQUIRE_TIMEOUT_MS: u64 = 5_000;

/// Default SQLite busy timeout applied to every connection
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// A connection checked out of a [`ConnectionPool`]
pub type SqliteConnection = PooledConnection<SqliteConnectionManager>;

/// Pool sizing and wait behaviour
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on open connections
    pub max_size: usize,

    /// How long `acquire` waits before giving up
    pub acquire_timeout: Duration,

    /// SQLite busy timeout for lock contention between connections
    pub busy_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            acquire_timeout: Duration::from_millis(DEFAULT_ACQUIRE_TIMEOUT_MS),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

/// Snapshot of pool occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Connections currently open (idle + checked out)
    pub open: usize,
    /// Connections waiting in the pool
    pub idle: usize,
}

/// Pool of SQLite connections to one database
pub struct ConnectionPool {
    pool: Pool<SqliteConnectionManager>,
    acquire_timeout: Duration,
}

impl ConnectionPool {
    /// Open a pool on `path`
    ///
    /// One connection is opened eagerly so a bad path fails here rather
    /// than on first use. An in-memory database is private to its
    /// connection, so such pools are capped at a single connection that
    /// is never recycled.
    pub fn open<P: AsRef<Path>>(path: P, config: PoolConfig) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let in_memory = is_in_memory(path);

        if config.max_size == 0 {
            return Err(StoreError::InvalidData(
                "pool max_size must be greater than 0".to_string(),
            ));
        }
        if config.acquire_timeout.is_zero() {
            return Err(StoreError::InvalidData(
                "pool acquire_timeout must be greater than 0".to_string(),
            ));
        }

        let max_size = if in_memory { 1 } else { config.max_size };
        let max_size = u32::try_from(max_size)
            .map_err(|_| StoreError::InvalidData(format!("pool max_size {} is too large", max_size)))?;

        let busy_timeout = config.busy_timeout;
        let manager = if in_memory {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(path)
        }
        .with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            if !in_memory {
                let mode: String =
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
                debug!(journal_mode = %mode, "Configured SQLite connection");
            }
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(1))
            .connection_timeout(config.acquire_timeout)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?;

        debug!(path = %path.display(), max_size, "Opened connection pool");

        Ok(Self {
            pool,
            acquire_timeout: config.acquire_timeout,
        })
    }

    /// Check out a connection, waiting up to the configured timeout
    pub fn acquire(&self) -> Result<SqliteConnection, StoreError> {
        self.pool.get().map_err(|e| {
            warn!(error = %e, "No pooled connection available");
            StoreError::PoolExhausted(self.acquire_timeout)
        })
    }

    /// Run `body` inside one transaction on a pooled connection
    ///
    /// Commits when `body` succeeds and rolls back when it fails. The
    /// connection goes back to the pool after commit or rollback, never
    /// before.
    pub fn with_transaction<T, F>(&self, body: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
    {
        let mut conn = self.acquire()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        match body(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Current occupancy
    pub fn status(&self) -> PoolStatus {
        let state = self.pool.state();
        PoolStatus {
            open: state.connections as usize,
            idle: state.idle_connections as usize,
        }
    }

    /// Effective maximum size
    pub fn max_size(&self) -> usize {
        self.pool.max_size() as usize
    }
}

fn is_in_memory(path: &Path) -> bool {
    let s = path.to_string_lossy();
    s.is_empty() || s == ":memory:" || s.starts_with("file::memory:")
}
