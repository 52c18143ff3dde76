//! Database migration system.
//!
//! Schema version stored in `PRAGMA user_version`. Migrations are forward-only
//! and never drop or rewrite existing rows. A database created before
//! versioning existed (table present, `user_version = 0`) is adopted as-is.

use rusqlite::Connection;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<()> {
    let current_version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(DbError::Sqlite)?;

    if current_version == 0 {
        if table_exists(conn, schema::RECORDS_TABLE)? {
            tracing::info!(
                "Adopting existing {} table as schema v{SCHEMA_VERSION}",
                schema::RECORDS_TABLE
            );
        } else {
            tracing::info!("Initializing database schema v{SCHEMA_VERSION}");
        }
        conn.execute_batch(schema::SCHEMA_V1)
            .map_err(DbError::Sqlite)?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(DbError::Sqlite)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "Database version {current_version} is newer than supported {SCHEMA_VERSION}"
        )));
    }

    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
