//! Medication history database operations (append-only).

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use super::{from_db_time, to_db_time, Database, DbError, DbResult};
use crate::models::{HistoryEntry, HistoryStatus};

/// Optional filters for history queries. Bounds apply to `scheduled_time`;
/// `start` is inclusive and `end` exclusive.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub pet_id: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

struct HistoryRow {
    id: String,
    user_id: String,
    pet_id: String,
    medication_id: String,
    dosage: String,
    scheduled_time: String,
    status: String,
    created_at: String,
}

fn history_row(row: &Row<'_>) -> rusqlite::Result<HistoryRow> {
    Ok(HistoryRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        pet_id: row.get(2)?,
        medication_id: row.get(3)?,
        dosage: row.get(4)?,
        scheduled_time: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl TryFrom<HistoryRow> for HistoryEntry {
    type Error = DbError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let status = match row.status.as_str() {
            "given" => HistoryStatus::Given,
            "missed" => HistoryStatus::Missed,
            other => {
                return Err(DbError::Constraint(format!(
                    "Unknown history status: {}",
                    other
                )))
            }
        };

        Ok(HistoryEntry {
            id: row.id,
            user_id: row.user_id,
            pet_id: row.pet_id,
            medication_id: row.medication_id,
            dosage: row.dosage,
            scheduled_time: from_db_time(&row.scheduled_time)?,
            status,
            created_at: row.created_at,
        })
    }
}

impl Database {
    /// Append a history entry.
    pub fn insert_history_entry(&self, entry: &HistoryEntry) -> DbResult<()> {
        let status = match entry.status {
            HistoryStatus::Given => "given",
            HistoryStatus::Missed => "missed",
        };

        self.conn.execute(
            r#"
            INSERT INTO medication_history (
                id, user_id, pet_id, medication_id, dosage,
                scheduled_time, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                entry.id,
                entry.user_id,
                entry.pet_id,
                entry.medication_id,
                entry.dosage,
                to_db_time(&entry.scheduled_time),
                status,
                entry.created_at,
            ],
        )?;
        Ok(())
    }

    /// List a user's history, most recently scheduled first.
    pub fn list_history(&self, user_id: &str, filter: &HistoryFilter) -> DbResult<Vec<HistoryEntry>> {
        let start = filter.start.as_ref().map(to_db_time);
        let end = filter.end.as_ref().map(to_db_time);

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, pet_id, medication_id, dosage,
                   scheduled_time, status, created_at
            FROM medication_history
            WHERE user_id = ?1
              AND (?2 IS NULL OR pet_id = ?2)
              AND (?3 IS NULL OR scheduled_time >= ?3)
              AND (?4 IS NULL OR scheduled_time < ?4)
            ORDER BY scheduled_time DESC, created_at DESC
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, filter.pet_id, start, end], history_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.try_into()?);
        }
        Ok(entries)
    }

    /// List history for one medication, oldest first.
    pub fn list_history_for_medication(&self, medication_id: &str) -> DbResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, pet_id, medication_id, dosage,
                   scheduled_time, status, created_at
            FROM medication_history
            WHERE medication_id = ?
            ORDER BY scheduled_time, created_at
            "#,
        )?;

        let rows = stmt.query_map([medication_id], history_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.try_into()?);
        }
        Ok(entries)
    }
}
