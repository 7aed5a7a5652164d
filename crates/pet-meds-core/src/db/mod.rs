//! Database layer for pet-meds.

mod schema;
mod pets;
mod medications;
mod reminders;
mod history;
mod subscriptions;
mod notifications;

pub use history::HistoryFilter;
pub use schema::*;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),
}

pub type DbResult<T> = Result<T, DbError>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        // Other handles on the same file may hold the write lock briefly
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside a transaction, rolling back if it fails.
    pub fn with_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Database) -> Result<T, E>,
        E: From<DbError>,
    {
        let tx = self.conn.unchecked_transaction().map_err(DbError::from)?;
        let value = f(self)?;
        tx.commit().map_err(DbError::from)?;
        Ok(value)
    }
}

/// Format a timestamp for storage.
///
/// Always UTC with millisecond precision, so stored values compare
/// correctly as strings in range queries.
pub fn to_db_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
pub fn from_db_time(s: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DbError::Timestamp(format!("{}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_open_file_reopens_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pets.db");

        {
            let db = Database::open(&path).unwrap();
            db.conn()
                .execute(
                    "INSERT INTO pets (id, user_id, name, species) VALUES ('p1', 'u1', 'Max', 'dog')",
                    [],
                )
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.count_pets("u1").unwrap(), 1);
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        // Check that tables exist
        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for table in [
            "pets",
            "medications",
            "reminders",
            "medication_history",
            "subscriptions",
            "notification_preferences",
            "notification_dispatches",
        ] {
            assert!(tables.contains(&table.to_string()), "missing table {}", table);
        }
    }

    #[test]
    fn test_with_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();

        let result: DbResult<()> = db.with_transaction(|db| {
            db.conn().execute(
                "INSERT INTO pets (id, user_id, name, species) VALUES ('p1', 'u1', 'Max', 'dog')",
                [],
            )?;
            Err(DbError::Constraint("abort".into()))
        });
        assert!(result.is_err());
        assert_eq!(db.count_pets("u1").unwrap(), 0);

        db.with_transaction(|db| {
            db.conn().execute(
                "INSERT INTO pets (id, user_id, name, species) VALUES ('p1', 'u1', 'Max', 'dog')",
                [],
            )?;
            Ok::<_, DbError>(())
        })
        .unwrap();
        assert_eq!(db.count_pets("u1").unwrap(), 1);
    }

    #[test]
    fn test_db_time_sorts_as_text() {
        let early = Utc.with_ymd_and_hms(2026, 3, 1, 9, 5, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        assert!(to_db_time(&early) < to_db_time(&late));
        assert_eq!(to_db_time(&early), "2026-03-01T09:05:00.000Z");
        assert_eq!(from_db_time(&to_db_time(&early)).unwrap(), early);
        assert!(from_db_time("yesterday").is_err());
    }
}
