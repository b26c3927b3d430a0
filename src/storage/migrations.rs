/// Database migration management
///
/// Creates and upgrades the SQLite schema. The database holds one row per
/// named record plus the bookkeeping the change feed needs: a global
/// revision counter and the id of the instance that wrote each row.

use rusqlite::Connection;

use crate::storage::StorageError;

/// Current database schema version
const CURRENT_VERSION: i32 = 1;

/// Create or upgrade the schema; safe to call on every open
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;
    if current_version > CURRENT_VERSION {
        return Err(StorageError::Migration(format!(
            "database schema v{} is newer than supported v{}",
            current_version, CURRENT_VERSION
        )));
    }

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0);

    Ok(version)
}

fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    Ok(())
}

/// Version 1: the record table and its revision index
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS records (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            revision INTEGER NOT NULL,
            writer TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // the change feed scans for rows newer than its last seen revision
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_records_revision
         ON records (revision)",
        [],
    )?;

    tracing::info!("Applied migration v1: created record table");
    Ok(())
}
