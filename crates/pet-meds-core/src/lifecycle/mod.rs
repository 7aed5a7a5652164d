//! Reminder lifecycle: creation, completion and cleanup.
//!
//! ```text
//!   pending ──mark_as_given──▶ given   (terminal)
//!      │
//!      └────mark_as_missed──▶ missed  (terminal, driven by an external sweep)
//! ```
//!
//! Completion writes the reminder status first and the history entry second.
//! The two writes are not atomic: if the history insert fails the error is
//! logged and the completion still succeeds.

mod schedule;

pub use schedule::*;

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::clock::{Clock, SystemClock};
use crate::db::{Database, DbError, DbResult};
use crate::models::{HistoryEntry, HistoryStatus, Medication, Reminder, ReminderStatus};

/// Lifecycle errors.
#[derive(Error, Debug)]
pub enum ReminderError {
    /// Absent, or owned by someone else
    #[error("Reminder not found: {0}")]
    NotFound(String),

    #[error("Reminder already completed: {0}")]
    AlreadyCompleted(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type ReminderResult<T> = Result<T, ReminderError>;

/// Reminder lifecycle manager.
pub struct ReminderLifecycle<'a> {
    db: &'a Database,
    clock: &'a dyn Clock,
}

impl<'a> ReminderLifecycle<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self::with_clock(db, &SystemClock)
    }

    /// Use `clock` for the `created_at` stamps on new reminders and history.
    pub fn with_clock(db: &'a Database, clock: &'a dyn Clock) -> Self {
        Self { db, clock }
    }

    /// Mark a pending reminder as given on behalf of `acting_user_id`.
    ///
    /// Fails with `NotFound` for reminders the user does not own, and with
    /// `AlreadyCompleted` for anything no longer pending, including the
    /// loser of two concurrent calls.
    pub fn mark_as_given(&self, reminder_id: &str, acting_user_id: &str) -> ReminderResult<Reminder> {
        let reminder = self
            .db
            .get_reminder(reminder_id)?
            .filter(|r| r.user_id == acting_user_id)
            .ok_or_else(|| ReminderError::NotFound(reminder_id.to_string()))?;

        let completed = self.complete(reminder, ReminderStatus::Given)?;
        info!(
            reminder_id = %completed.id,
            medication_id = %completed.medication_id,
            "Reminder marked as given"
        );
        Ok(completed)
    }

    /// Mark a pending reminder as missed.
    ///
    /// Called by the external missed-reminder sweep, so there is no
    /// ownership check.
    pub fn mark_as_missed(&self, reminder_id: &str) -> ReminderResult<Reminder> {
        let reminder = self
            .db
            .get_reminder(reminder_id)?
            .ok_or_else(|| ReminderError::NotFound(reminder_id.to_string()))?;

        let completed = self.complete(reminder, ReminderStatus::Missed)?;
        info!(reminder_id = %completed.id, "Reminder marked as missed");
        Ok(completed)
    }

    fn complete(&self, mut reminder: Reminder, status: ReminderStatus) -> ReminderResult<Reminder> {
        if !reminder.is_pending() {
            return Err(ReminderError::AlreadyCompleted(reminder.id));
        }

        // Conditional update: only one caller can move the row off pending
        if !self.db.complete_pending_reminder(&reminder.id, status)? {
            debug!(reminder_id = %reminder.id, "Lost completion race");
            return Err(ReminderError::AlreadyCompleted(reminder.id));
        }
        reminder.status = status;

        let history_status = match status {
            ReminderStatus::Missed => HistoryStatus::Missed,
            _ => HistoryStatus::Given,
        };
        if let Err(e) = self.record_history(&reminder, history_status) {
            error!(
                "Failed to write history for reminder {}: {}",
                reminder.id, e
            );
        }

        Ok(reminder)
    }

    fn record_history(&self, reminder: &Reminder, status: HistoryStatus) -> DbResult<HistoryEntry> {
        let medication = self
            .db
            .get_medication(&reminder.medication_id)?
            .ok_or_else(|| DbError::NotFound(format!("medication {}", reminder.medication_id)))?;

        let entry = HistoryEntry::from_reminder(reminder, medication.dosage, status)
            .stamped(&self.clock.now());
        self.db.insert_history_entry(&entry)?;
        Ok(entry)
    }

    /// Insert one pending reminder for a medication.
    pub fn create_reminder(
        &self,
        medication: &Medication,
        scheduled_time: DateTime<Utc>,
    ) -> ReminderResult<Reminder> {
        let reminder = Reminder::new(medication, scheduled_time).stamped(&self.clock.now());
        self.db.insert_reminder(&reminder)?;
        debug!(
            reminder_id = %reminder.id,
            medication_id = %medication.id,
            scheduled_time = %reminder.scheduled_time,
            "Reminder created"
        );
        Ok(reminder)
    }

    /// Remove a medication's pending reminders scheduled after `now`.
    ///
    /// Past and completed reminders stay, and history is never touched.
    pub fn delete_future_reminders(
        &self,
        medication_id: &str,
        now: DateTime<Utc>,
    ) -> ReminderResult<usize> {
        let deleted = self.db.delete_future_pending_reminders(medication_id, &now)?;
        debug!(medication_id, deleted, "Deleted future reminders");
        Ok(deleted)
    }

    /// Replace future reminders with one at the medication's next slot.
    ///
    /// Returns `None` when that slot already has a reminder, for example a
    /// dose given early today. Completed reminders are never re-issued.
    pub fn reschedule(
        &self,
        medication: &Medication,
        now: DateTime<Utc>,
        offset: &FixedOffset,
    ) -> ReminderResult<Option<Reminder>> {
        self.delete_future_reminders(&medication.id, now)?;

        let next = next_occurrence(medication.timing, now, offset);
        if self.db.reminder_exists_at(&medication.id, &next)? {
            debug!(medication_id = %medication.id, scheduled_time = %next, "Slot already taken");
            return Ok(None);
        }
        self.create_reminder(medication, next).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{Frequency, Pet};
    use chrono::{Duration, NaiveTime, TimeZone};

    fn setup() -> (Database, Medication) {
        let db = Database::open_in_memory().unwrap();
        let pet = Pet::new("user-1".into(), "Max".into(), "dog".into());
        db.insert_pet(&pet).unwrap();
        let med = Medication::new(
            "user-1".into(),
            pet.id.clone(),
            "Carprofen".into(),
            "1 tablet".into(),
            Frequency::Daily,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        );
        db.insert_medication(&med).unwrap();
        (db, med)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_mark_as_given_writes_history() {
        let (db, med) = setup();
        let lifecycle = ReminderLifecycle::new(&db);
        let reminder = lifecycle.create_reminder(&med, now()).unwrap();

        let given = lifecycle.mark_as_given(&reminder.id, "user-1").unwrap();
        assert_eq!(given.status, ReminderStatus::Given);

        let stored = db.get_reminder(&reminder.id).unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Given);

        let history = db.list_history_for_medication(&med.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, HistoryStatus::Given);
        assert_eq!(history[0].dosage, "1 tablet");
        assert_eq!(history[0].scheduled_time, reminder.scheduled_time);
        assert_eq!(history[0].pet_id, med.pet_id);
    }

    #[test]
    fn test_second_call_already_completed() {
        let (db, med) = setup();
        let lifecycle = ReminderLifecycle::new(&db);
        let reminder = lifecycle.create_reminder(&med, now()).unwrap();

        lifecycle.mark_as_given(&reminder.id, "user-1").unwrap();
        let second = lifecycle.mark_as_given(&reminder.id, "user-1");
        assert!(matches!(second, Err(ReminderError::AlreadyCompleted(_))));

        assert_eq!(db.list_history_for_medication(&med.id).unwrap().len(), 1);
    }

    #[test]
    fn test_other_user_gets_not_found() {
        let (db, med) = setup();
        let lifecycle = ReminderLifecycle::new(&db);
        let reminder = lifecycle.create_reminder(&med, now()).unwrap();

        let result = lifecycle.mark_as_given(&reminder.id, "user-2");
        assert!(matches!(result, Err(ReminderError::NotFound(_))));

        let missing = lifecycle.mark_as_given("no-such-reminder", "user-2");
        assert!(matches!(missing, Err(ReminderError::NotFound(_))));

        // Same message shape either way
        assert_eq!(
            result.unwrap_err().to_string(),
            format!("Reminder not found: {}", reminder.id)
        );

        let stored = db.get_reminder(&reminder.id).unwrap().unwrap();
        assert!(stored.is_pending());
    }

    #[test]
    fn test_history_failure_does_not_fail_completion() {
        let (db, med) = setup();
        let lifecycle = ReminderLifecycle::new(&db);
        let reminder = lifecycle.create_reminder(&med, now()).unwrap();

        db.conn()
            .execute_batch("DROP TABLE medication_history")
            .unwrap();

        let given = lifecycle.mark_as_given(&reminder.id, "user-1").unwrap();
        assert_eq!(given.status, ReminderStatus::Given);

        let stored = db.get_reminder(&reminder.id).unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Given);
    }

    #[test]
    fn test_mark_as_missed() {
        let (db, med) = setup();
        let lifecycle = ReminderLifecycle::new(&db);
        let reminder = lifecycle.create_reminder(&med, now()).unwrap();

        let missed = lifecycle.mark_as_missed(&reminder.id).unwrap();
        assert_eq!(missed.status, ReminderStatus::Missed);

        let given = lifecycle.mark_as_given(&reminder.id, "user-1");
        assert!(matches!(given, Err(ReminderError::AlreadyCompleted(_))));

        let history = db.list_history_for_medication(&med.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, HistoryStatus::Missed);
    }

    #[test]
    fn test_delete_future_keeps_past_and_history() {
        let (db, med) = setup();
        let lifecycle = ReminderLifecycle::new(&db);

        let past = lifecycle
            .create_reminder(&med, now() - Duration::hours(4))
            .unwrap();
        lifecycle.mark_as_given(&past.id, "user-1").unwrap();
        let overdue = lifecycle
            .create_reminder(&med, now() - Duration::hours(1))
            .unwrap();
        lifecycle
            .create_reminder(&med, now() + Duration::hours(6))
            .unwrap();

        assert_eq!(lifecycle.delete_future_reminders(&med.id, now()).unwrap(), 1);

        let remaining: Vec<_> = db
            .list_reminders_for_medication(&med.id)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(remaining, vec![past.id, overdue.id]);
        assert_eq!(db.list_history_for_medication(&med.id).unwrap().len(), 1);
    }

    #[test]
    fn test_reschedule_replaces_future_reminder() {
        let (db, mut med) = setup();
        let lifecycle = ReminderLifecycle::new(&db);
        let utc = FixedOffset::east_opt(0).unwrap();

        let first = lifecycle.reschedule(&med, now(), &utc).unwrap().unwrap();
        // 08:00 already passed at 12:00, so tomorrow
        assert_eq!(
            first.scheduled_time,
            Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap()
        );

        med.timing = NaiveTime::from_hms_opt(18, 0, 0).unwrap();
        let second = lifecycle.reschedule(&med, now(), &utc).unwrap().unwrap();
        assert_eq!(
            second.scheduled_time,
            Utc.with_ymd_and_hms(2026, 3, 9, 18, 0, 0).unwrap()
        );

        let reminders = db.list_reminders_for_medication(&med.id).unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].id, second.id);
    }

    #[test]
    fn test_reschedule_skips_slot_already_given() {
        let (db, mut med) = setup();
        let lifecycle = ReminderLifecycle::new(&db);
        let utc = FixedOffset::east_opt(0).unwrap();
        // Today's 13:00 dose given an hour early
        med.timing = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
        let today = lifecycle
            .create_reminder(&med, Utc.with_ymd_and_hms(2026, 3, 9, 13, 0, 0).unwrap())
            .unwrap();
        lifecycle.mark_as_given(&today.id, "user-1").unwrap();

        med.notes = Some("with food".into());
        assert!(lifecycle.reschedule(&med, now(), &utc).unwrap().is_none());

        let reminders = db.list_reminders_for_medication(&med.id).unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].status, ReminderStatus::Given);
    }

    #[test]
    fn test_timestamps_follow_clock() {
        let (db, med) = setup();
        let clock = FixedClock::new(now());
        let lifecycle = ReminderLifecycle::with_clock(&db, &clock);

        let reminder = lifecycle.create_reminder(&med, now()).unwrap();
        assert_eq!(reminder.created_at, now().to_rfc3339());

        clock.advance(Duration::minutes(3));
        lifecycle.mark_as_given(&reminder.id, "user-1").unwrap();
        let history = db.list_history_for_medication(&med.id).unwrap();
        assert_eq!(history[0].created_at, (now() + Duration::minutes(3)).to_rfc3339());
    }
}
