//! Durable, append-only storage for captured requests.

pub mod sqlite;

pub use sqlite::SqliteLogStore;

use crate::models::{NewLogEntry, PathCount, PathEntry};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Raw database message, surfaced to callers unchanged.
    #[error("{0}")]
    DatabaseError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

/// Storage backend for the request log.
///
/// Implementations serialize their own writes; callers share one handle
/// across all concurrent requests and never retry.
pub trait LogStore: Send + Sync {
    /// Append one entry and return its id. Ids strictly increase in commit order.
    fn insert(&self, entry: &NewLogEntry) -> Result<i64, StoreError>;

    /// Count entries grouped by path. Row order is unspecified.
    fn count_by_path(&self) -> Result<Vec<PathCount>, StoreError>;

    /// All entries for `path`, oldest first.
    fn entries_for_path(&self, path: &str) -> Result<Vec<PathEntry>, StoreError>;
}
