//! Persistence gateway.
//!
//! The shell only reads stored records by key. Feature modules own the
//! writes; this module exposes the narrow `RecordStore` interface the status
//! service and startup sequence depend on, and a SQLite implementation.

use crate::error::{Result, ShellError};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Table a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordTable {
    /// Per-user records
    UserData,
    /// Per-guild records
    ServData,
}

impl RecordTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordTable::UserData => "userdata",
            RecordTable::ServData => "servdata",
        }
    }
}

/// Read access to stored records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Open the backend. Calling it again on a connected store is a no-op.
    async fn connect(&self) -> Result<()>;

    /// Fetch the serialized record stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored for `key`.
    async fn fetch(&self, table: RecordTable, key: u64) -> Result<Option<String>>;
}

/// SQLite-backed record store.
pub struct SqliteStore {
    db_path: String,
    connected: AtomicBool,
}

impl SqliteStore {
    /// Create a store for the database file at `db_path`.
    ///
    /// Nothing touches the file until [`RecordStore::connect`] is called.
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            connected: AtomicBool::new(false),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

fn init_db_sync(path: &str) -> Result<()> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ShellError::Connection(format!(
                    "Failed to create database directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let conn = Connection::open(path)
        .map_err(|e| ShellError::Connection(format!("Failed to open database: {}", e)))?;

    for table in [RecordTable::UserData, RecordTable::ServData] {
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    UUID INTEGER NOT NULL PRIMARY KEY,
                    info TEXT NOT NULL
                )",
                table.as_str()
            ),
            [],
        )
        .map_err(|e| ShellError::Connection(format!("Failed to initialize schema: {}", e)))?;
    }

    Ok(())
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn connect(&self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        let path = self.db_path.clone();
        tokio::task::spawn_blocking(move || init_db_sync(&path))
            .await
            .map_err(|e| ShellError::Connection(format!("Task join error: {}", e)))??;

        self.connected.store(true, Ordering::Release);
        tracing::info!(path = %self.db_path, "Connected to record store");
        Ok(())
    }

    async fn fetch(&self, table: RecordTable, key: u64) -> Result<Option<String>> {
        if !self.is_connected() {
            return Err(ShellError::Connection(
                "Record store is not connected".to_string(),
            ));
        }

        // Snowflakes never exceed i64::MAX, so nothing can be stored above it.
        let key = match i64::try_from(key) {
            Ok(key) => key,
            Err(_) => return Ok(None),
        };

        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)?;
            let info = conn
                .query_row(
                    &format!("SELECT info FROM {} WHERE UUID = ?1", table.as_str()),
                    rusqlite::params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(info)
        })
        .await
        .map_err(|e| ShellError::Database(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Helper function to create a connected store in a temporary directory
    async fn setup_test_store() -> (TempDir, SqliteStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("nested").join("test.db");
        let db_path_str = db_path.to_str().expect("Invalid path").to_string();

        let store = SqliteStore::new(db_path_str);
        store.connect().await.expect("Failed to connect store");
        (temp_dir, store)
    }

    fn insert(store: &SqliteStore, table: RecordTable, key: i64, info: &str) {
        let conn = Connection::open(&store.db_path).unwrap();
        conn.execute(
            &format!("INSERT INTO {} (UUID, info) VALUES (?1, ?2)", table.as_str()),
            rusqlite::params![key, info],
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_fetch_stored_record() {
        let (_temp_dir, store) = setup_test_store().await;
        insert(&store, RecordTable::UserData, 122739797646245899, r#"{"money":5}"#);

        let result = store
            .fetch(RecordTable::UserData, 122739797646245899)
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some(r#"{"money":5}"#));
    }

    #[tokio::test]
    async fn test_fetch_missing_record() {
        let (_temp_dir, store) = setup_test_store().await;

        let result = store.fetch(RecordTable::ServData, 42).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_tables_are_separate() {
        let (_temp_dir, store) = setup_test_store().await;
        insert(&store, RecordTable::ServData, 7, r#"{"currency":"gold"}"#);

        assert!(store.fetch(RecordTable::UserData, 7).await.unwrap().is_none());
        assert!(store.fetch(RecordTable::ServData, 7).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_key_above_i64_range_is_a_miss() {
        let (_temp_dir, store) = setup_test_store().await;

        let result = store.fetch(RecordTable::UserData, u64::MAX).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_before_connect_fails() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let store = SqliteStore::new(db_path.to_str().unwrap().to_string());

        let result = store.fetch(RecordTable::UserData, 1).await;
        assert!(matches!(result, Err(ShellError::Connection(_))));
    }

    #[tokio::test]
    async fn test_connect_is_idempotent() {
        let (_temp_dir, store) = setup_test_store().await;
        insert(&store, RecordTable::UserData, 1, "{}");

        store.connect().await.unwrap();
        assert!(store.is_connected());
        assert!(store.fetch(RecordTable::UserData, 1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_connect_unreachable_backend() {
        let temp_dir = TempDir::new().unwrap();
        // A directory cannot be opened as a database file.
        let store = SqliteStore::new(temp_dir.path().to_str().unwrap().to_string());

        let result = store.connect().await;
        assert!(matches!(result, Err(ShellError::Connection(_))));
        assert!(!store.is_connected());
    }
}
