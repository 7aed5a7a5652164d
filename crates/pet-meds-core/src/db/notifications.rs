//! Notification preference and dispatch-claim operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{NotificationChannel, NotificationPreference};

impl Database {
    /// Insert or replace a user's notification preferences.
    pub fn upsert_notification_preference(&self, pref: &NotificationPreference) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO notification_preferences (user_id, email_enabled, push_enabled, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                email_enabled = excluded.email_enabled,
                push_enabled = excluded.push_enabled,
                updated_at = excluded.updated_at
            "#,
            params![
                pref.user_id,
                pref.email_enabled,
                pref.push_enabled,
                pref.updated_at
            ],
        )?;
        Ok(())
    }

    /// Get a user's saved notification preferences.
    pub fn get_notification_preference(
        &self,
        user_id: &str,
    ) -> DbResult<Option<NotificationPreference>> {
        self.conn
            .query_row(
                r#"
                SELECT user_id, email_enabled, push_enabled, updated_at
                FROM notification_preferences
                WHERE user_id = ?
                "#,
                [user_id],
                |row| {
                    Ok(NotificationPreference {
                        user_id: row.get(0)?,
                        email_enabled: row.get(1)?,
                        push_enabled: row.get(2)?,
                        updated_at: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Claim the right to send `reminder_id` on `channel`.
    ///
    /// Returns `false` if the pair was already claimed.
    pub fn claim_dispatch(
        &self,
        reminder_id: &str,
        channel: NotificationChannel,
        sent_at: &str,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            INSERT OR IGNORE INTO notification_dispatches (reminder_id, channel, sent_at)
            VALUES (?1, ?2, ?3)
            "#,
            params![reminder_id, channel.as_str(), sent_at],
        )?;
        Ok(rows_affected > 0)
    }

    /// Drop a claim so the pair can be retried.
    pub fn release_dispatch(&self, reminder_id: &str, channel: NotificationChannel) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM notification_dispatches WHERE reminder_id = ?1 AND channel = ?2",
            params![reminder_id, channel.as_str()],
        )?;
        Ok(rows_affected > 0)
    }

    /// Channels already sent for a reminder.
    pub fn list_dispatched_channels(&self, reminder_id: &str) -> DbResult<Vec<NotificationChannel>> {
        let mut stmt = self.conn.prepare(
            "SELECT channel FROM notification_dispatches WHERE reminder_id = ? ORDER BY channel",
        )?;
        let rows = stmt.query_map([reminder_id], |row| row.get::<_, String>(0))?;

        let mut channels = Vec::new();
        for row in rows {
            match row?.as_str() {
                "email" => channels.push(NotificationChannel::Email),
                "push" => channels.push(NotificationChannel::Push),
                _ => {}
            }
        }
        Ok(channels)
    }
}
