use std::path::Path;
use std::sync::Mutex;
use rusqlite::{Connection, params};

use super::{LogStore, StoreError};
use crate::models::{NewLogEntry, PathCount, PathEntry};

/// SQLite-backed request log.
pub struct SqliteLogStore {
    conn: Mutex<Connection>,
}

impl SqliteLogStore {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        // Parse sqlite: prefix if present
        let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

        // Create parent directories if needed
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::IoError(e.to_string()))?;
            }
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        tracing::info!("Request log initialized with database: {}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, discarded on drop.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                method TEXT NOT NULL,
                path TEXT NOT NULL,
                query TEXT NOT NULL,
                headers TEXT NOT NULL,
                body TEXT NOT NULL,
                created TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_log_path ON log(path)",
            [],
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))
    }
}

impl LogStore for SqliteLogStore {
    fn insert(&self, entry: &NewLogEntry) -> Result<i64, StoreError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO log (method, path, query, headers, body, created)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.method,
                entry.path,
                entry.query,
                entry.headers,
                entry.body,
                entry.created.to_rfc3339(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn count_by_path(&self) -> Result<Vec<PathCount>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT path, COUNT(id) AS counter FROM log GROUP BY path")?;
        let rows = stmt.query_map([], |row| {
            Ok(PathCount {
                path: row.get(0)?,
                counter: row.get(1)?,
            })
        })?;

        let counts = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    fn entries_for_path(&self, path: &str) -> Result<Vec<PathEntry>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT method, query, created FROM log WHERE path = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![path], |row| {
            Ok(PathEntry {
                method: row.get(0)?,
                query: row.get(1)?,
                created: row.get(2)?,
            })
        })?;

        let entries = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(method: &str, path: &str) -> NewLogEntry {
        NewLogEntry::new(method, path)
    }

    #[test]
    fn test_ids_strictly_increase() {
        let store = SqliteLogStore::in_memory().unwrap();
        let ids: Vec<i64> = (0..5)
            .map(|_| store.insert(&entry("GET", "/login/")).unwrap())
            .collect();

        assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids not increasing: {:?}", ids);
    }

    #[test]
    fn test_count_by_path() {
        let store = SqliteLogStore::in_memory().unwrap();
        store.insert(&entry("GET", "/a/")).unwrap();
        store.insert(&entry("POST", "/a/")).unwrap();
        store.insert(&entry("GET", "/b/")).unwrap();

        let mut counts = store.count_by_path().unwrap();
        counts.sort_by(|x, y| x.path.cmp(&y.path));

        assert_eq!(counts, vec![
            PathCount { path: "/a/".to_string(), counter: 2 },
            PathCount { path: "/b/".to_string(), counter: 1 },
        ]);
    }

    #[test]
    fn test_count_by_path_empty() {
        let store = SqliteLogStore::in_memory().unwrap();
        assert!(store.count_by_path().unwrap().is_empty());
    }

    #[test]
    fn test_entries_for_path_in_insertion_order() {
        let store = SqliteLogStore::in_memory().unwrap();
        let mut first = entry("PUT", "/a/");
        first.query = "x=1".to_string();
        store.insert(&first).unwrap();
        store.insert(&entry("GET", "/b/")).unwrap();
        store.insert(&entry("DELETE", "/a/")).unwrap();

        let entries = store.entries_for_path("/a/").unwrap();
        let methods: Vec<&str> = entries.iter().map(|e| e.method.as_str()).collect();
        assert_eq!(methods, vec!["PUT", "DELETE"]);
        assert_eq!(entries[0].query, "x=1");
        assert_eq!(entries[0].created, first.created.to_rfc3339());
    }

    #[test]
    fn test_entries_for_unknown_path() {
        let store = SqliteLogStore::in_memory().unwrap();
        store.insert(&entry("GET", "/a/")).unwrap();
        assert!(store.entries_for_path("/zzz/").unwrap().is_empty());
    }

    #[test]
    fn test_body_bytes_stored_unchanged() {
        let store = SqliteLogStore::in_memory().unwrap();
        let mut binary = entry("POST", "/login/");
        binary.body = vec![0xff, 0xfe, 0x41];
        let id = store.insert(&binary).unwrap();

        let conn = store.conn.lock().unwrap();
        let stored: Vec<u8> = conn
            .query_row("SELECT body FROM log WHERE id = ?1", params![id], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, vec![0xffu8, 0xfe, 0x41]);
    }

    #[test]
    fn test_open_file_persists_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("data.sqlite");
        let url = format!("sqlite:{}", db_path.display());

        {
            let store = SqliteLogStore::open(&url).unwrap();
            store.insert(&entry("GET", "/login/")).unwrap();
        }

        let store = SqliteLogStore::open(&url).unwrap();
        let next_id = store.insert(&entry("GET", "/login/")).unwrap();
        assert_eq!(next_id, 2);
        assert_eq!(store.count_by_path().unwrap()[0].counter, 2);
    }
}
