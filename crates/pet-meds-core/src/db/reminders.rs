//! Reminder database operations.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{from_db_time, to_db_time, Database, DbError, DbResult};
use crate::models::{Reminder, ReminderStatus};

const REMINDER_COLUMNS: &str =
    "id, user_id, pet_id, medication_id, scheduled_time, status, created_at";

/// Intermediate row struct for database mapping.
struct ReminderRow {
    id: String,
    user_id: String,
    pet_id: String,
    medication_id: String,
    scheduled_time: String,
    status: String,
    created_at: String,
}

fn reminder_row(row: &Row<'_>) -> rusqlite::Result<ReminderRow> {
    Ok(ReminderRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        pet_id: row.get(2)?,
        medication_id: row.get(3)?,
        scheduled_time: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl TryFrom<ReminderRow> for Reminder {
    type Error = DbError;

    fn try_from(row: ReminderRow) -> Result<Self, Self::Error> {
        Ok(Reminder {
            id: row.id,
            user_id: row.user_id,
            pet_id: row.pet_id,
            medication_id: row.medication_id,
            scheduled_time: from_db_time(&row.scheduled_time)?,
            status: string_to_status(&row.status)?,
            created_at: row.created_at,
        })
    }
}

fn status_to_string(status: ReminderStatus) -> &'static str {
    match status {
        ReminderStatus::Pending => "pending",
        ReminderStatus::Given => "given",
        ReminderStatus::Missed => "missed",
    }
}

fn string_to_status(s: &str) -> Result<ReminderStatus, DbError> {
    match s {
        "pending" => Ok(ReminderStatus::Pending),
        "given" => Ok(ReminderStatus::Given),
        "missed" => Ok(ReminderStatus::Missed),
        _ => Err(DbError::Constraint(format!("Unknown reminder status: {}", s))),
    }
}

impl Database {
    /// Insert a new reminder.
    pub fn insert_reminder(&self, reminder: &Reminder) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO reminders (
                id, user_id, pet_id, medication_id, scheduled_time, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                reminder.id,
                reminder.user_id,
                reminder.pet_id,
                reminder.medication_id,
                to_db_time(&reminder.scheduled_time),
                status_to_string(reminder.status),
                reminder.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a reminder by ID.
    pub fn get_reminder(&self, id: &str) -> DbResult<Option<Reminder>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM reminders WHERE id = ?", REMINDER_COLUMNS),
                [id],
                reminder_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a user's reminders with `start <= scheduled_time < end`, earliest first.
    pub fn list_reminders_between(
        &self,
        user_id: &str,
        start: &DateTime<Utc>,
        end: &DateTime<Utc>,
    ) -> DbResult<Vec<Reminder>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {} FROM reminders
            WHERE user_id = ?1 AND scheduled_time >= ?2 AND scheduled_time < ?3
            ORDER BY scheduled_time, id
            "#,
            REMINDER_COLUMNS
        ))?;

        let rows = stmt.query_map(
            params![user_id, to_db_time(start), to_db_time(end)],
            reminder_row,
        )?;

        let mut reminders = Vec::new();
        for row in rows {
            reminders.push(row?.try_into()?);
        }
        Ok(reminders)
    }

    /// Whether a medication already has a reminder at `scheduled_time`, in any status.
    pub fn reminder_exists_at(
        &self,
        medication_id: &str,
        scheduled_time: &DateTime<Utc>,
    ) -> DbResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reminders WHERE medication_id = ?1 AND scheduled_time = ?2",
            params![medication_id, to_db_time(scheduled_time)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List all reminders for a medication, earliest first.
    pub fn list_reminders_for_medication(&self, medication_id: &str) -> DbResult<Vec<Reminder>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM reminders WHERE medication_id = ? ORDER BY scheduled_time, id",
            REMINDER_COLUMNS
        ))?;

        let rows = stmt.query_map([medication_id], reminder_row)?;

        let mut reminders = Vec::new();
        for row in rows {
            reminders.push(row?.try_into()?);
        }
        Ok(reminders)
    }

    /// Move a pending reminder to `status`.
    ///
    /// The update only applies while the row is still pending, so of two
    /// racing callers exactly one sees `true`.
    pub fn complete_pending_reminder(&self, id: &str, status: ReminderStatus) -> DbResult<bool> {
        if status == ReminderStatus::Pending {
            return Err(DbError::Constraint(
                "Cannot complete a reminder as pending".into(),
            ));
        }
        let rows_affected = self.conn.execute(
            "UPDATE reminders SET status = ?2 WHERE id = ?1 AND status = 'pending'",
            params![id, status_to_string(status)],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete pending reminders of a medication scheduled after `now`.
    ///
    /// Past and completed reminders are kept.
    pub fn delete_future_pending_reminders(
        &self,
        medication_id: &str,
        now: &DateTime<Utc>,
    ) -> DbResult<usize> {
        let rows_affected = self.conn.execute(
            r#"
            DELETE FROM reminders
            WHERE medication_id = ?1 AND status = 'pending' AND scheduled_time > ?2
            "#,
            params![medication_id, to_db_time(now)],
        )?;
        Ok(rows_affected)
    }
}
