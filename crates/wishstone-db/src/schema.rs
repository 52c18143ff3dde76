//! SQL schema definitions.

/// Name of the submissions table. Kept from the first deployment so
/// existing database files open unchanged.
pub const RECORDS_TABLE: &str = "WishStone_Records";

/// Complete schema for the v1 database.
///
/// `current_time` collides with an SQLite keyword and is always quoted.
pub const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS WishStone_Records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_ip TEXT,
    user_text TEXT,
    wish_type TEXT,
    sentiment TEXT,
    country_name TEXT,
    "current_time" TEXT,
    utc_time TEXT,
    timezone TEXT
);

CREATE INDEX IF NOT EXISTS idx_records_client_ip ON WishStone_Records(client_ip);
"#;
