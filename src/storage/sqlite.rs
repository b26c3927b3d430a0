/// SQLite implementation of the record store
///
/// Each record is one row keyed by its storage key. Every write bumps a
/// database-wide revision and stamps the row with the writing instance's
/// id, which lets [`SqliteChangeFeed`] tell other processes' writes apart
/// from its own.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::storage::{migrations, KeyValueStore, StorageError, StorageKey};
use crate::sync::{ChangeFeed, StorageEvent};

/// SQLite-backed record store
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
    instance_id: String,
}

/// Open a connection and bring its schema up to date
fn open_connection(db_path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open(db_path)
        .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

    // concurrent instances share the file
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(|e| StorageError::Connection(format!("Failed to set busy timeout: {}", e)))?;

    migrations::initialize_database(&conn)?;
    Ok(conn)
}

impl SqliteStore {
    /// Open (or create) the database file and run any pending migrations
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = open_connection(&db_path)?;
        let instance_id = Uuid::new_v4().to_string();

        tracing::info!("SQLite storage initialized at: {:?} (instance {})", db_path, instance_id);

        Ok(Self {
            conn,
            path: db_path,
            instance_id,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A feed of writes other instances make to the same database file
    pub fn change_feed(&self) -> Result<SqliteChangeFeed, StorageError> {
        SqliteChangeFeed::new(&self.path, self.instance_id.clone())
    }
}

impl KeyValueStore for SqliteStore {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM records WHERE key = ?1",
                params![key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO records (key, value, revision, writer, updated_at)
             VALUES (?1, ?2, (SELECT COALESCE(MAX(revision), 0) + 1 FROM records), ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                revision = excluded.revision,
                writer = excluded.writer,
                updated_at = excluded.updated_at",
            params![key.as_str(), value, self.instance_id, Utc::now().to_rfc3339()],
        )?;

        debug!("Wrote record {} ({} bytes)", key, value.len());
        Ok(())
    }
}

/// Polls a database file for records written by other instances
///
/// Holds its own connection. Only rows with a revision above the last one
/// seen are reported, so events already observed are never replayed.
pub struct SqliteChangeFeed {
    conn: Connection,
    writer_id: String,
    last_seen: i64,
}

impl SqliteChangeFeed {
    /// Start watching `db_path`, ignoring rows written by `writer_id`
    ///
    /// Rows present at creation time count as seen.
    pub fn new(db_path: &Path, writer_id: String) -> Result<Self, StorageError> {
        let conn = open_connection(db_path)?;
        let last_seen = conn.query_row(
            "SELECT COALESCE(MAX(revision), 0) FROM records",
            [],
            |row| row.get::<_, i64>(0),
        )?;

        Ok(Self {
            conn,
            writer_id,
            last_seen,
        })
    }

    fn fetch_changes(&mut self) -> Result<Vec<StorageEvent>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT key, value, revision, writer FROM records
             WHERE revision > ?1 ORDER BY revision",
        )?;

        let rows = stmt.query_map(params![self.last_seen], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut events = Vec::new();
        let mut last_seen = self.last_seen;
        for row in rows {
            let (key, value, revision, writer) = row?;
            last_seen = last_seen.max(revision);

            if writer == self.writer_id {
                continue;
            }
            match key.parse::<StorageKey>() {
                Ok(key) => events.push(StorageEvent::new(key, value)),
                Err(e) => warn!("Ignoring change to unrecognised record: {}", e),
            }
        }

        self.last_seen = last_seen;
        Ok(events)
    }
}

impl ChangeFeed for SqliteChangeFeed {
    /// The database write itself is the publication
    fn publish(&self, _event: &StorageEvent) {}

    fn poll(&mut self) -> Vec<StorageEvent> {
        match self.fetch_changes() {
            Ok(events) => events,
            Err(e) => {
                warn!("Failed to poll for external changes: {}", e);
                Vec::new()
            }
        }
    }
}
