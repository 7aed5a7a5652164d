//! Reminder models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{now_rfc3339, Medication};

/// Persisted reminder status. `Given` and `Missed` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Given,
    Missed,
}

/// A single "give this medication at this time" instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub pet_id: String,
    pub medication_id: String,
    /// When the dose is due
    pub scheduled_time: DateTime<Utc>,
    pub status: ReminderStatus,
    /// Creation timestamp
    pub created_at: String,
}

impl Reminder {
    /// Create a pending reminder for a medication.
    pub fn new(medication: &Medication, scheduled_time: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: medication.user_id.clone(),
            pet_id: medication.pet_id.clone(),
            medication_id: medication.id.clone(),
            scheduled_time,
            status: ReminderStatus::Pending,
            created_at: now_rfc3339(),
        }
    }

    pub fn stamped(mut self, now: &DateTime<Utc>) -> Self {
        self.created_at = now.to_rfc3339();
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReminderStatus::Pending
    }
}
