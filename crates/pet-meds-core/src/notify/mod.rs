//! Notification trigger contract.
//!
//! An external dispatcher calls [`NotificationTrigger::fire`] for a reminder
//! it believes is due. The trigger reads the user's channel preferences,
//! claims each `(reminder, channel)` pair in the database and hands only
//! freshly claimed pairs to the [`Notifier`] transport, so repeated or
//! concurrent calls never send the same reminder twice on one channel.

mod recording;

pub use recording::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::db::{Database, DbError};
use crate::models::{NotificationChannel, NotificationPreference};
use crate::status::StatusEngine;

/// Notification errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Reminder is not due: {0}")]
    NotDue(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// A later channel failed after earlier ones in the same call went out.
    /// The sent channels stay claimed.
    #[error("Sent on {} before failing: {source}", channel_list(.sent))]
    PartialDelivery {
        sent: Vec<NotificationChannel>,
        source: Box<NotifyError>,
    },

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type NotifyResult<T> = Result<T, NotifyError>;

fn channel_list(channels: &[NotificationChannel]) -> String {
    channels
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Payload handed to the transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub reminder_id: String,
    pub user_id: String,
    pub pet_id: String,
    pub medication_name: String,
    pub dosage: String,
    pub scheduled_time: DateTime<Utc>,
    pub channel: NotificationChannel,
}

/// Outbound transport (email provider, push service).
pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> NotifyResult<()>;
}

/// Channels a preference record enables, email first.
pub fn channels_for(pref: &NotificationPreference) -> Vec<NotificationChannel> {
    pref.channels()
}

/// Fires notifications for due reminders.
pub struct NotificationTrigger<'a> {
    db: &'a Database,
    notifier: &'a dyn Notifier,
    engine: StatusEngine,
}

impl<'a> NotificationTrigger<'a> {
    pub fn new(db: &'a Database, notifier: &'a dyn Notifier, engine: StatusEngine) -> Self {
        Self {
            db,
            notifier,
            engine,
        }
    }

    /// Preferences for a user, falling back to defaults if never saved.
    pub fn preferences(&self, user_id: &str) -> NotifyResult<NotificationPreference> {
        Ok(self
            .db
            .get_notification_preference(user_id)?
            .unwrap_or_else(|| NotificationPreference::default_for(user_id.to_string())))
    }

    /// Send a reminder on every enabled channel not already used for it.
    ///
    /// The reminder must be pending and inside the due-now window. Returns
    /// the channels sent on this call, which is empty when everything was
    /// already sent or the user disabled all channels.
    ///
    /// A transport failure releases that channel's claim and stops. If
    /// earlier channels already went out the error is `PartialDelivery`
    /// naming them.
    pub fn fire(&self, reminder_id: &str, now: DateTime<Utc>) -> NotifyResult<Vec<NotificationChannel>> {
        let reminder = self
            .db
            .get_reminder(reminder_id)?
            .ok_or_else(|| NotifyError::NotFound(format!("reminder {}", reminder_id)))?;

        if !reminder.is_pending() || !self.engine.within_due_now_window(reminder.scheduled_time, now) {
            return Err(NotifyError::NotDue(reminder.id));
        }

        let medication = self
            .db
            .get_medication(&reminder.medication_id)?
            .ok_or_else(|| NotifyError::NotFound(format!("medication {}", reminder.medication_id)))?;
        let prefs = self.preferences(&reminder.user_id)?;
        let sent_at = now.to_rfc3339();

        let mut sent = Vec::new();
        for channel in channels_for(&prefs) {
            if !self.db.claim_dispatch(&reminder.id, channel, &sent_at)? {
                debug!(reminder_id = %reminder.id, channel = channel.as_str(), "Already dispatched");
                continue;
            }

            let notification = Notification {
                reminder_id: reminder.id.clone(),
                user_id: reminder.user_id.clone(),
                pet_id: reminder.pet_id.clone(),
                medication_name: medication.name.clone(),
                dosage: medication.dosage.clone(),
                scheduled_time: reminder.scheduled_time,
                channel,
            };

            if let Err(e) = self.notifier.send(&notification) {
                error!(
                    "Error sending {} notification for reminder {}: {}",
                    channel.as_str(),
                    reminder.id,
                    e
                );
                // Let the next call retry this channel
                self.db.release_dispatch(&reminder.id, channel)?;
                if sent.is_empty() {
                    return Err(e);
                }
                return Err(NotifyError::PartialDelivery {
                    sent,
                    source: Box::new(e),
                });
            }
            sent.push(channel);
        }

        info!(reminder_id = %reminder.id, channels = sent.len(), "Reminder notifications dispatched");
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::ReminderLifecycle;
    use crate::models::{Frequency, Medication, Pet, Reminder};
    use chrono::{Duration, NaiveTime, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap()
    }

    fn setup(offset_minutes: i64) -> (Database, Reminder) {
        let db = Database::open_in_memory().unwrap();
        let pet = Pet::new("user-1".into(), "Max".into(), "dog".into());
        db.insert_pet(&pet).unwrap();
        let med = Medication::new(
            "user-1".into(),
            pet.id.clone(),
            "Apoquel".into(),
            "16mg".into(),
            Frequency::Daily,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        );
        db.insert_medication(&med).unwrap();
        let reminder = ReminderLifecycle::new(&db)
            .create_reminder(&med, now() + Duration::minutes(offset_minutes))
            .unwrap();
        (db, reminder)
    }

    #[test]
    fn test_fires_once_per_channel() {
        let (db, reminder) = setup(5);
        let notifier = RecordingNotifier::new();
        let trigger = NotificationTrigger::new(&db, &notifier, StatusEngine::default());

        let sent = trigger.fire(&reminder.id, now()).unwrap();
        assert_eq!(sent, vec![NotificationChannel::Email]);

        let again = trigger.fire(&reminder.id, now()).unwrap();
        assert!(again.is_empty());

        let log = notifier.sent();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].medication_name, "Apoquel");
        assert_eq!(log[0].dosage, "16mg");
    }

    #[test]
    fn test_respects_preferences() {
        let (db, reminder) = setup(0);
        let mut pref = NotificationPreference::default_for("user-1".into());
        pref.email_enabled = false;
        pref.push_enabled = true;
        db.upsert_notification_preference(&pref).unwrap();

        let notifier = RecordingNotifier::new();
        let trigger = NotificationTrigger::new(&db, &notifier, StatusEngine::default());

        let sent = trigger.fire(&reminder.id, now()).unwrap();
        assert_eq!(sent, vec![NotificationChannel::Push]);
        assert_eq!(notifier.sent_on(NotificationChannel::Email).len(), 0);
    }

    #[test]
    fn test_not_due_rejected() {
        let (db, reminder) = setup(90);
        let notifier = RecordingNotifier::new();
        let trigger = NotificationTrigger::new(&db, &notifier, StatusEngine::default());

        let result = trigger.fire(&reminder.id, now());
        assert!(matches!(result, Err(NotifyError::NotDue(_))));
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn test_completed_reminder_not_sent() {
        let (db, reminder) = setup(0);
        ReminderLifecycle::new(&db)
            .mark_as_given(&reminder.id, "user-1")
            .unwrap();

        let notifier = RecordingNotifier::new();
        let trigger = NotificationTrigger::new(&db, &notifier, StatusEngine::default());
        assert!(matches!(
            trigger.fire(&reminder.id, now()),
            Err(NotifyError::NotDue(_))
        ));
    }

    #[test]
    fn test_transport_failure_releases_claim() {
        let (db, reminder) = setup(-10);
        let notifier = RecordingNotifier::new();
        notifier.fail_on(NotificationChannel::Email);
        let trigger = NotificationTrigger::new(&db, &notifier, StatusEngine::default());

        let result = trigger.fire(&reminder.id, now());
        assert!(matches!(result, Err(NotifyError::Transport(_))));
        assert!(db.list_dispatched_channels(&reminder.id).unwrap().is_empty());

        notifier.reset();
        let sent = trigger.fire(&reminder.id, now()).unwrap();
        assert_eq!(sent, vec![NotificationChannel::Email]);
    }

    #[test]
    fn test_push_failure_after_email_reports_partial_delivery() {
        let (db, reminder) = setup(0);
        let mut pref = NotificationPreference::default_for("user-1".into());
        pref.push_enabled = true;
        db.upsert_notification_preference(&pref).unwrap();

        let notifier = RecordingNotifier::new();
        notifier.fail_on(NotificationChannel::Push);
        let trigger = NotificationTrigger::new(&db, &notifier, StatusEngine::default());

        let err = trigger.fire(&reminder.id, now()).unwrap_err();
        match &err {
            NotifyError::PartialDelivery { sent, source } => {
                assert_eq!(sent, &vec![NotificationChannel::Email]);
                assert!(matches!(**source, NotifyError::Transport(_)));
            }
            other => panic!("expected partial delivery, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "Sent on email before failing: Transport error: push delivery failed"
        );
        assert_eq!(
            db.list_dispatched_channels(&reminder.id).unwrap(),
            vec![NotificationChannel::Email]
        );

        // Only push is retried
        notifier.reset();
        let sent = trigger.fire(&reminder.id, now()).unwrap();
        assert_eq!(sent, vec![NotificationChannel::Push]);
        assert!(notifier.sent_on(NotificationChannel::Email).is_empty());
    }

    #[test]
    fn test_unknown_reminder() {
        let db = Database::open_in_memory().unwrap();
        let notifier = RecordingNotifier::new();
        let trigger = NotificationTrigger::new(&db, &notifier, StatusEngine::default());
        assert!(matches!(
            trigger.fire("missing", now()),
            Err(NotifyError::NotFound(_))
        ));
    }
}
