//! Helpers shared by unit and integration tests.

use std::sync::{Arc, Mutex};

use crate::models::{NewLogEntry, PathCount, PathEntry};
use crate::store::{LogStore, SqliteLogStore, StoreError};
use crate::AppState;

/// State backed by a fresh in-memory SQLite database.
pub fn sqlite_state() -> (Arc<AppState>, Arc<SqliteLogStore>) {
    let store = Arc::new(SqliteLogStore::in_memory().expect("in-memory database"));
    let state = Arc::new(AppState::new(store.clone()));
    (state, store)
}

/// State backed by a [`RecordingStore`].
pub fn recording_state() -> (Arc<AppState>, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::default());
    let state = Arc::new(AppState::new(store.clone()));
    (state, store)
}

/// State whose store fails every call with `message`.
pub fn failing_state(message: &str) -> Arc<AppState> {
    Arc::new(AppState::new(Arc::new(FailingStore::new(message))))
}

/// Keeps inserted entries in memory so tests can inspect every field.
#[derive(Default)]
pub struct RecordingStore {
    entries: Mutex<Vec<NewLogEntry>>,
}

impl RecordingStore {
    pub fn entries(&self) -> Vec<NewLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl LogStore for RecordingStore {
    fn insert(&self, entry: &NewLogEntry) -> Result<i64, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries.push(entry.clone());
        Ok(entries.len() as i64)
    }

    fn count_by_path(&self) -> Result<Vec<PathCount>, StoreError> {
        let mut counts: Vec<PathCount> = Vec::new();
        for entry in self.entries.lock().unwrap().iter() {
            match counts.iter_mut().find(|c| c.path == entry.path) {
                Some(count) => count.counter += 1,
                None => counts.push(PathCount { path: entry.path.clone(), counter: 1 }),
            }
        }
        Ok(counts)
    }

    fn entries_for_path(&self, path: &str) -> Result<Vec<PathEntry>, StoreError> {
        Ok(self.entries.lock().unwrap()
            .iter()
            .filter(|e| e.path == path)
            .map(|e| PathEntry {
                method: e.method.clone(),
                query: e.query.clone(),
                created: e.created.to_rfc3339(),
            })
            .collect())
    }
}

/// Store that rejects every read and write.
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: &str) -> Self {
        Self { message: message.to_string() }
    }

    fn error(&self) -> StoreError {
        StoreError::DatabaseError(self.message.clone())
    }
}

impl LogStore for FailingStore {
    fn insert(&self, _entry: &NewLogEntry) -> Result<i64, StoreError> {
        Err(self.error())
    }

    fn count_by_path(&self) -> Result<Vec<PathCount>, StoreError> {
        Err(self.error())
    }

    fn entries_for_path(&self, _path: &str) -> Result<Vec<PathEntry>, StoreError> {
        Err(self.error())
    }
}
