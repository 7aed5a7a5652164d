//! Subscription database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Subscription, SubscriptionStatus};

impl Database {
    /// Insert or replace a user's subscription.
    pub fn upsert_subscription(&self, sub: &Subscription) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO subscriptions (user_id, status, plan, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                status = excluded.status,
                plan = excluded.plan,
                updated_at = excluded.updated_at
            "#,
            params![sub.user_id, sub.status.as_str(), sub.plan, sub.updated_at],
        )?;
        Ok(())
    }

    /// Get a user's subscription, if any.
    pub fn get_subscription(&self, user_id: &str) -> DbResult<Option<Subscription>> {
        let row = self
            .conn
            .query_row(
                "SELECT user_id, status, plan, updated_at FROM subscriptions WHERE user_id = ?",
                [user_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(user_id, status, plan, updated_at)| {
            let status = SubscriptionStatus::parse(&status)
                .map_err(|e| DbError::Constraint(e.to_string()))?;
            Ok(Subscription {
                user_id,
                status,
                plan,
                updated_at,
            })
        })
        .transpose()
    }
}
