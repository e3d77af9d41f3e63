pub mod memory;
pub mod migrations;
pub mod queries;
pub mod sqlite;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rusqlite::Connection;

use crate::config::{AppConfig, StorageBackend};
use crate::models::{Booking, NewBooking, StatusChange};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("data file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt booking row {id}: {reason}")]
    Corrupt { id: i64, reason: String },

    #[error("storage lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Result of a compare-and-set on a booking's status.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Applied(Booking),
    AlreadyFinal(Booking),
    NotFound,
}

/// Persistence for bookings. Every method is atomic with respect to the
/// others on the same store.
pub trait BookingStore: Send + Sync {
    fn create(&self, booking: NewBooking) -> StoreResult<Booking>;

    fn get(&self, id: i64) -> StoreResult<Option<Booking>>;

    fn list(&self) -> StoreResult<Vec<Booking>>;

    /// Apply `change` only if the booking is still pending.
    fn transition(&self, id: i64, change: &StatusChange) -> StoreResult<Transition>;
}

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("failed to set busy timeout")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

pub fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn BookingStore>> {
    let store: Arc<dyn BookingStore> = match config.storage_backend {
        StorageBackend::Sqlite => {
            tracing::info!(path = %config.database_url, "using SQLite storage");
            Arc::new(SqliteStore::open(&config.database_url)?)
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, bookings are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::File => {
            tracing::info!(path = %config.data_file, "using JSON file storage");
            Arc::new(MemoryStore::with_file(&config.data_file)?)
        }
    };
    Ok(store)
}
