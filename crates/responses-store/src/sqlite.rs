//! Embedded SQLite backend.
//!
//! The connection lives behind an `Arc<Mutex<>>` and every call is shipped
//! to tokio's blocking pool. Uniqueness of (guild_id, name) is enforced by
//! a unique index, so inserts never need a prior lookup.

use crate::backend::ResponseBackend;
use crate::error::{StoreError, StoreResult};
use crate::types::ResponseRecord;
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

/// Database file created inside the configured storage directory.
pub const DB_FILE_NAME: &str = "responses.sqlite";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS responses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    guild_id TEXT NOT NULL,
    name TEXT NOT NULL,
    "trigger" TEXT NOT NULL,
    response TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_guild_name ON responses(guild_id, name);
"#;

const SELECT_COLUMNS: &str = r#"SELECT guild_id, name, "trigger", response, created_at FROM responses"#;

/// SQLite-backed response store.
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Open (or create) `<dir>/responses.sqlite`, creating `dir` if needed.
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::task::spawn_blocking(move || Self::open_blocking(&dir)).await?
    }

    fn open_blocking(dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(dir).map_err(|e| {
            StoreError::BackendUnavailable(format!(
                "cannot create storage directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let path = dir.join(DB_FILE_NAME);
        info!(path = %path.display(), "Opening SQLite response store");

        let conn = Connection::open(&path).map_err(|e| {
            StoreError::BackendUnavailable(format!("cannot open {}: {}", path.display(), e))
        })?;

        Self::init(conn)
    }

    /// In-memory database, mostly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        debug!("Opening in-memory SQLite response store");
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        // Writers queue instead of failing with SQLITE_BUSY.
        conn.pragma_update(None, "busy_timeout", 5_000_i32)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn execute<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::TaskJoin(format!("connection mutex poisoned: {e}")))?;
            f(&conn)
        })
        .await?
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ResponseRecord> {
    Ok(ResponseRecord {
        guild_id: row.get(0)?,
        name: row.get(1)?,
        trigger: row.get(2)?,
        response: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[async_trait]
impl ResponseBackend for SqliteBackend {
    #[instrument(skip(self, record), fields(guild_id = %record.guild_id, name = %record.name))]
    async fn insert_unique(&self, record: &ResponseRecord) -> StoreResult<()> {
        let record = record.clone();
        self.execute(move |conn| {
            let result = conn.execute(
                r#"INSERT INTO responses (guild_id, name, "trigger", response, created_at)
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
                params![
                    record.guild_id,
                    record.name,
                    record.trigger,
                    record.response,
                    record.created_at
                ],
            );
            match result {
                Ok(_) => {
                    debug!("Inserted response");
                    Ok(())
                }
                Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateName {
                    guild_id: record.guild_id,
                    name: record.name,
                }),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_by_name(&self, guild_id: &str, name: &str) -> StoreResult<Option<ResponseRecord>> {
        let guild_id = guild_id.to_string();
        let name = name.to_string();
        self.execute(move |conn| {
            let result = conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE guild_id = ?1 AND name = ?2"),
                params![guild_id, name],
                row_to_record,
            );
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_by_name(&self, guild_id: &str, name: &str) -> StoreResult<()> {
        let guild_id = guild_id.to_string();
        let name = name.to_string();
        self.execute(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM responses WHERE guild_id = ?1 AND name = ?2",
                params![guild_id, name],
            )?;
            if deleted == 0 {
                return Err(StoreError::NotFound { guild_id, name });
            }
            debug!("Deleted response");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, trigger, response))]
    async fn update_by_name(
        &self,
        guild_id: &str,
        name: &str,
        trigger: &str,
        response: &str,
    ) -> StoreResult<()> {
        let guild_id = guild_id.to_string();
        let name = name.to_string();
        let trigger = trigger.to_string();
        let response = response.to_string();
        self.execute(move |conn| {
            let updated = conn.execute(
                r#"UPDATE responses SET "trigger" = ?1, response = ?2
                   WHERE guild_id = ?3 AND name = ?4"#,
                params![trigger, response, guild_id, name],
            )?;
            if updated == 0 {
                return Err(StoreError::NotFound { guild_id, name });
            }
            debug!("Updated response");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_by_guild(&self, guild_id: &str) -> StoreResult<Vec<ResponseRecord>> {
        let guild_id = guild_id.to_string();
        self.execute(move |conn| {
            // id breaks ties between records created in the same millisecond.
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE guild_id = ?1 ORDER BY created_at DESC, id DESC"
            ))?;
            let records = stmt
                .query_map(params![guild_id], row_to_record)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        })
        .await
    }

    async fn health_check(&self) -> bool {
        self.execute(|conn| {
            let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
            Ok(one == 1)
        })
        .await
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(guild: &str, name: &str, trigger: &str, created_at: i64) -> ResponseRecord {
        ResponseRecord {
            guild_id: guild.into(),
            name: name.into(),
            trigger: trigger.into(),
            response: format!("reply to {}", trigger),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        let rec = record("g1", "greet", "hello", 1_000);

        backend.insert_unique(&rec).await.unwrap();

        let found = backend.get_by_name("g1", "greet").await.unwrap();
        assert_eq!(found, Some(rec));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        assert!(backend.get_by_name("g1", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected_without_mutation() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.insert_unique(&record("g1", "greet", "hello", 1_000)).await.unwrap();

        let err = backend
            .insert_unique(&record("g1", "greet", "other", 2_000))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { ref name, .. } if name == "greet"));

        let stored = backend.get_by_name("g1", "greet").await.unwrap().unwrap();
        assert_eq!(stored.trigger, "hello");
        assert_eq!(backend.list_by_guild("g1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_same_name_in_other_guild_allowed() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.insert_unique(&record("g1", "greet", "hello", 1_000)).await.unwrap();
        backend.insert_unique(&record("g2", "greet", "hello", 1_000)).await.unwrap();

        assert_eq!(backend.list_by_guild("g1").await.unwrap().len(), 1);
        assert_eq!(backend.list_by_guild("g2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        let err = backend.delete_by_name("g1", "ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        let err = backend
            .update_by_name("g1", "ghost", "t", "r")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.insert_unique(&record("g1", "greet", "hello", 1_234)).await.unwrap();

        backend
            .update_by_name("g1", "greet", "hi", "Hey!")
            .await
            .unwrap();

        let stored = backend.get_by_name("g1", "greet").await.unwrap().unwrap();
        assert_eq!(stored.trigger, "hi");
        assert_eq!(stored.response, "Hey!");
        assert_eq!(stored.created_at, 1_234);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_tie_break() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.insert_unique(&record("g1", "old", "a", 1_000)).await.unwrap();
        backend.insert_unique(&record("g1", "tie-first", "b", 2_000)).await.unwrap();
        backend.insert_unique(&record("g1", "tie-second", "c", 2_000)).await.unwrap();

        let names: Vec<_> = backend
            .list_by_guild("g1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["tie-second", "tie-first", "old"]);
    }

    #[tokio::test]
    async fn test_list_empty_guild() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        assert!(backend.list_by_guild("empty").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_check() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        assert!(backend.health_check().await);
    }

    #[tokio::test]
    async fn test_open_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("bot");

        let backend = SqliteBackend::open(&nested).await.unwrap();
        backend.insert_unique(&record("g1", "greet", "hello", 1)).await.unwrap();

        assert!(nested.join(DB_FILE_NAME).exists());
    }
}
