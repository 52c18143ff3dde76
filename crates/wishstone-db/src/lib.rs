//! # wishstone-db
//!
//! Durable storage for accepted wish submissions.
//! Manages the single SQLite database (by default `wishstone_database.db`
//! inside the data directory).
//!
//! ## Schema
//!
//! - One append-only table, `WishStone_Records`
//! - Every column is TEXT except the auto-increment `id`
//! - `client_ip` holds ciphertext only
//! - Schema version stored in `PRAGMA user_version`
//!
//! Callers normally go through [`store::RecordStore`]; the free functions in
//! [`queries`] operate on a bare [`rusqlite::Connection`].

pub mod migrations;
pub mod queries;
pub mod schema;
pub mod store;

use rusqlite::Connection;
use std::path::Path;

pub use store::{RecordStore, SqliteRecordStore};

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open or create the database at the given path.
///
/// Configures WAL mode and runs any pending migrations. Existing rows are
/// never dropped or rewritten.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory() {
        let conn = open_memory().expect("open in-memory db");
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("get user_version");
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_wal_mode() {
        let conn = open_memory().expect("open");
        let mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .expect("get journal_mode");
        // In-memory databases use "memory" mode, not WAL
        assert!(mode == "wal" || mode == "memory");
    }

    #[test]
    fn test_open_file_twice_keeps_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("wishstone_database.db");

        {
            let conn = open(&path).expect("first open");
            conn.execute(
                "INSERT INTO WishStone_Records (client_ip, user_text, wish_type, sentiment,
                     country_name, \"current_time\", utc_time, timezone)
                 VALUES ('c', 't', 'Unknown', 'Unknown', 'KR', 'x', '2024-01-01 00:00:00', 'UTC')",
                [],
            )
            .expect("insert");
        }

        let conn = open(&path).expect("second open");
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM WishStone_Records", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }
}
