//! Medication history (append-only audit log).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{now_rfc3339, Reminder};

/// Outcome recorded in history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    Given,
    Missed,
}

/// Immutable record of a completed reminder.
///
/// Entries keep their own copy of the ids and dosage so they survive
/// deletion of the medication, reminder or pet they came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub user_id: String,
    pub pet_id: String,
    pub medication_id: String,
    /// Dosage text at completion time
    pub dosage: String,
    /// Copied from the reminder
    pub scheduled_time: DateTime<Utc>,
    pub status: HistoryStatus,
    pub created_at: String,
}

impl HistoryEntry {
    /// Snapshot a reminder at completion.
    pub fn from_reminder(reminder: &Reminder, dosage: String, status: HistoryStatus) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: reminder.user_id.clone(),
            pet_id: reminder.pet_id.clone(),
            medication_id: reminder.medication_id.clone(),
            dosage,
            scheduled_time: reminder.scheduled_time,
            status,
            created_at: now_rfc3339(),
        }
    }

    pub fn stamped(mut self, now: &DateTime<Utc>) -> Self {
        self.created_at = now.to_rfc3339();
        self
    }
}
