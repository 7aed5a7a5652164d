//! Medication database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{parse_timing, Frequency, Medication};

const MEDICATION_COLUMNS: &str = "id, user_id, pet_id, name, dosage, frequency, timing, \
                                  duration, notes, created_at, updated_at";

/// Intermediate row struct for database mapping.
struct MedicationRow {
    id: String,
    user_id: String,
    pet_id: String,
    name: String,
    dosage: String,
    frequency: String,
    timing: String,
    duration: Option<String>,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

fn medication_row(row: &Row<'_>) -> rusqlite::Result<MedicationRow> {
    Ok(MedicationRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        pet_id: row.get(2)?,
        name: row.get(3)?,
        dosage: row.get(4)?,
        frequency: row.get(5)?,
        timing: row.get(6)?,
        duration: row.get(7)?,
        notes: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

impl TryFrom<MedicationRow> for Medication {
    type Error = DbError;

    fn try_from(row: MedicationRow) -> Result<Self, Self::Error> {
        let frequency =
            Frequency::parse(&row.frequency).map_err(|e| DbError::Constraint(e.to_string()))?;
        let timing = parse_timing(&row.timing).map_err(|e| DbError::Constraint(e.to_string()))?;

        Ok(Medication {
            id: row.id,
            user_id: row.user_id,
            pet_id: row.pet_id,
            name: row.name,
            dosage: row.dosage,
            frequency,
            timing,
            duration: row.duration,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Database {
    /// Insert a new medication.
    pub fn insert_medication(&self, med: &Medication) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO medications (
                id, user_id, pet_id, name, dosage, frequency, timing,
                duration, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                med.id,
                med.user_id,
                med.pet_id,
                med.name,
                med.dosage,
                med.frequency.as_str(),
                med.timing_str(),
                med.duration,
                med.notes,
                med.created_at,
                med.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing medication owned by `med.user_id`.
    pub fn update_medication(&self, med: &Medication) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE medications SET
                name = ?3,
                dosage = ?4,
                frequency = ?5,
                timing = ?6,
                duration = ?7,
                notes = ?8,
                updated_at = ?9,
                pet_id = ?10
            WHERE id = ?1 AND user_id = ?2
            "#,
            params![
                med.id,
                med.user_id,
                med.name,
                med.dosage,
                med.frequency.as_str(),
                med.timing_str(),
                med.duration,
                med.notes,
                med.updated_at,
                med.pet_id,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a medication by ID regardless of owner.
    ///
    /// Only for internal callers that already hold an owned record
    /// referencing it (e.g. a reminder).
    pub fn get_medication(&self, id: &str) -> DbResult<Option<Medication>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM medications WHERE id = ?", MEDICATION_COLUMNS),
                [id],
                medication_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Get a medication by ID, only if owned by `user_id`.
    pub fn get_medication_for_user(&self, id: &str, user_id: &str) -> DbResult<Option<Medication>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM medications WHERE id = ? AND user_id = ?",
                    MEDICATION_COLUMNS
                ),
                [id, user_id],
                medication_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a user's medications, optionally for one pet.
    pub fn list_medications(&self, user_id: &str, pet_id: Option<&str>) -> DbResult<Vec<Medication>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {} FROM medications
            WHERE user_id = ?1 AND (?2 IS NULL OR pet_id = ?2)
            ORDER BY timing, name
            "#,
            MEDICATION_COLUMNS
        ))?;

        let rows = stmt.query_map(params![user_id, pet_id], medication_row)?;

        let mut medications = Vec::new();
        for row in rows {
            medications.push(row?.try_into()?);
        }
        Ok(medications)
    }

    /// Count a user's medications across all pets (for plan limits).
    pub fn count_medications(&self, user_id: &str) -> DbResult<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM medications WHERE user_id = ?",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a medication. Its reminders cascade; history stays.
    pub fn delete_medication(&self, id: &str, user_id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM medications WHERE id = ? AND user_id = ?",
            [id, user_id],
        )?;
        Ok(rows_affected > 0)
    }
}
