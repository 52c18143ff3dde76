//! Submission record query functions.
//!
//! "Day" filters compare the date part of the client-reported `utc_time`
//! column (via SQLite `DATE()`) against a caller-supplied `YYYY-MM-DD`.

use chrono::NaiveDate;
use rusqlite::Connection;
use wishstone_types::record::{NewRecord, RecordRow};

use crate::Result;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Append one record, returning its assigned id.
pub fn insert(conn: &Connection, record: &NewRecord) -> Result<i64> {
    conn.execute(
        "INSERT INTO WishStone_Records
             (client_ip, user_text, wish_type, sentiment, country_name,
              \"current_time\", utc_time, timezone)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            record.client_ip,
            record.user_text,
            record.classification.wish_type.as_str(),
            record.classification.sentiment.as_str(),
            record.country_name,
            record.current_time,
            record.utc_time,
            record.timezone,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Count records whose `utc_time` falls on `date`.
pub fn count_on_date(conn: &Connection, date: NaiveDate) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM WishStone_Records WHERE DATE(utc_time) = ?1",
        [date.format(DATE_FORMAT).to_string()],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Count records on `date` whose `client_ip` equals `encrypted_ip` exactly.
pub fn count_for_ip_on_date(conn: &Connection, encrypted_ip: &str, date: NaiveDate) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM WishStone_Records
         WHERE DATE(utc_time) = ?1 AND client_ip = ?2",
        rusqlite::params![date.format(DATE_FORMAT).to_string(), encrypted_ip],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Most recent records by `utc_time`, newest first.
///
/// `utc_time` is a client-supplied string, so ties and ordering against the
/// assigned id are not meaningful.
pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<RecordRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, client_ip, user_text, wish_type, sentiment, country_name,
                \"current_time\", utc_time, timezone
         FROM WishStone_Records
         ORDER BY utc_time DESC
         LIMIT ?1",
    )?;

    let rows = stmt
        .query_map([limit as i64], |row| {
            Ok(RecordRow {
                id: row.get(0)?,
                client_ip: text(row, 1)?,
                user_text: text(row, 2)?,
                wish_type: text(row, 3)?,
                sentiment: text(row, 4)?,
                country_name: text(row, 5)?,
                current_time: text(row, 6)?,
                utc_time: text(row, 7)?,
                timezone: text(row, 8)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Count every stored record.
pub fn count_all(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM WishStone_Records", [], |row| row.get(0))?;
    Ok(count as u64)
}

// Legacy rows may hold NULL in any text column.
fn text(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wishstone_types::wish::{Classification, Sentiment, WishType};

    fn test_db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).expect("date")
    }

    fn record(ip: &str, utc_time: &str) -> NewRecord {
        NewRecord {
            client_ip: ip.to_string(),
            user_text: "I wish for a new bike".to_string(),
            classification: Classification::new(WishType::Material, Sentiment::Positive),
            country_name: "KR".to_string(),
            current_time: utc_time.to_string(),
            utc_time: utc_time.to_string(),
            timezone: "UTC".to_string(),
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let conn = test_db();
        let first = insert(&conn, &record("a", "2024-01-01 10:00:00")).expect("insert");
        let second = insert(&conn, &record("b", "2024-01-01 11:00:00")).expect("insert");
        assert!(second > first);
        assert_eq!(count_all(&conn).expect("count"), 2);
    }

    #[test]
    fn test_labels_stored_as_text() {
        let conn = test_db();
        insert(&conn, &record("a", "2024-01-01 10:00:00")).expect("insert");
        let rows = recent(&conn, 10).expect("recent");
        assert_eq!(rows[0].wish_type, "Material");
        assert_eq!(rows[0].sentiment, "Positive");
        assert_eq!(rows[0].current_time, "2024-01-01 10:00:00");
    }

    #[test]
    fn test_count_on_date() {
        let conn = test_db();
        insert(&conn, &record("a", "2024-01-01 10:00:00")).expect("insert");
        insert(&conn, &record("b", "2024-01-01T23:59:59.000Z")).expect("insert");
        insert(&conn, &record("c", "2024-01-02 00:00:01")).expect("insert");

        assert_eq!(count_on_date(&conn, day("2024-01-01")).expect("count"), 2);
        assert_eq!(count_on_date(&conn, day("2024-01-02")).expect("count"), 1);
        assert_eq!(count_on_date(&conn, day("2024-01-03")).expect("count"), 0);
    }

    #[test]
    fn test_unparseable_utc_time_never_counts() {
        let conn = test_db();
        insert(&conn, &record("a", "")).expect("insert");
        insert(&conn, &record("b", "yesterday")).expect("insert");
        assert_eq!(count_on_date(&conn, day("2024-01-01")).expect("count"), 0);
    }

    #[test]
    fn test_count_for_ip_on_date() {
        let conn = test_db();
        insert(&conn, &record("cipher-a", "2024-01-01 10:00:00")).expect("insert");
        insert(&conn, &record("cipher-a", "2024-01-02 10:00:00")).expect("insert");
        insert(&conn, &record("cipher-b", "2024-01-01 12:00:00")).expect("insert");

        let d = day("2024-01-01");
        assert_eq!(count_for_ip_on_date(&conn, "cipher-a", d).expect("count"), 1);
        assert_eq!(count_for_ip_on_date(&conn, "cipher-b", d).expect("count"), 1);
        assert_eq!(count_for_ip_on_date(&conn, "cipher-c", d).expect("count"), 0);
    }

    #[test]
    fn test_recent_orders_by_utc_time_desc() {
        let conn = test_db();
        insert(&conn, &record("a", "2024-01-01 10:00:00")).expect("insert");
        insert(&conn, &record("b", "2024-03-01 10:00:00")).expect("insert");
        insert(&conn, &record("c", "2024-02-01 10:00:00")).expect("insert");

        let rows = recent(&conn, 10).expect("recent");
        let order: Vec<_> = rows.iter().map(|r| r.client_ip.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }

    #[test]
    fn test_recent_respects_limit() {
        let conn = test_db();
        for hour in 0..15 {
            let ts = format!("2024-01-01 {hour:02}:00:00");
            insert(&conn, &record("a", &ts)).expect("insert");
        }
        let rows = recent(&conn, 10).expect("recent");
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].utc_time, "2024-01-01 14:00:00");
    }

    #[test]
    fn test_null_columns_read_as_empty() {
        let conn = test_db();
        conn.execute(
            "INSERT INTO WishStone_Records (client_ip, utc_time) VALUES ('x', '2024-01-01 00:00:00')",
            [],
        )
        .expect("sparse insert");
        let rows = recent(&conn, 10).expect("recent");
        assert_eq!(rows[0].user_text, "");
        assert_eq!(rows[0].timezone, "");
    }
}
