//! The record store handle shared by request handlers.
//!
//! [`RecordStore`] is the seam the submission pipeline is written against;
//! [`SqliteRecordStore`] is the production implementation. All statements on
//! one store run under a single async mutex, so an insert is never observed
//! half-written by a concurrent count.
//!
//! "Today" is the local process clock's calendar date, compared against the
//! date part of each record's client-reported `utc_time`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;
use tokio::sync::Mutex;
use wishstone_types::record::{NewRecord, RecordRow};

use crate::{queries::records, Result};

/// Source of the current calendar date.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Durable, append-only table of submissions.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append one record, returning its assigned id.
    async fn insert(&self, record: &NewRecord) -> Result<i64>;

    /// Records stored for today, across all clients.
    async fn count_global_today(&self) -> Result<u64>;

    /// Records stored for today whose encrypted IP equals `encrypted_ip`.
    async fn count_for_encrypted_ip_today(&self, encrypted_ip: &str) -> Result<u64>;

    /// Up to `limit` records, newest `utc_time` first.
    async fn recent(&self, limit: usize) -> Result<Vec<RecordRow>>;
}

/// SQLite-backed [`RecordStore`].
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
    clock: Clock,
}

impl SqliteRecordStore {
    /// Open (creating if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_connection(crate::open(path)?))
    }

    /// Open a private in-memory database.
    pub fn open_memory() -> Result<Self> {
        Ok(Self::from_connection(crate::open_memory()?))
    }

    /// Wrap an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            clock: Arc::new(|| chrono::Local::now().date_naive()),
        }
    }

    /// Replace the clock used to decide what "today" is.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Total number of stored records.
    pub async fn count_all(&self) -> Result<u64> {
        let conn = self.conn.lock().await;
        records::count_all(&conn)
    }

    fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert(&self, record: &NewRecord) -> Result<i64> {
        let conn = self.conn.lock().await;
        records::insert(&conn, record)
    }

    async fn count_global_today(&self) -> Result<u64> {
        let today = self.today();
        let conn = self.conn.lock().await;
        records::count_on_date(&conn, today)
    }

    async fn count_for_encrypted_ip_today(&self, encrypted_ip: &str) -> Result<u64> {
        let today = self.today();
        let conn = self.conn.lock().await;
        records::count_for_ip_on_date(&conn, encrypted_ip, today)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<RecordRow>> {
        let conn = self.conn.lock().await;
        records::recent(&conn, limit)
    }
}
