//! Notification preference models.

use serde::{Deserialize, Serialize};

use super::now_rfc3339;

/// Outbound channel a reminder can be sent on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Push,
}

impl NotificationChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationChannel::Email => "email",
            NotificationChannel::Push => "push",
        }
    }
}

/// Which channels a user wants reminders on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationPreference {
    pub user_id: String,
    pub email_enabled: bool,
    pub push_enabled: bool,
    pub updated_at: String,
}

impl NotificationPreference {
    /// Defaults for a user who never saved preferences: email only.
    pub fn default_for(user_id: String) -> Self {
        Self {
            user_id,
            email_enabled: true,
            push_enabled: false,
            updated_at: now_rfc3339(),
        }
    }

    /// Enabled channels, email first.
    pub fn channels(&self) -> Vec<NotificationChannel> {
        let mut channels = Vec::with_capacity(2);
        if self.email_enabled {
            channels.push(NotificationChannel::Email);
        }
        if self.push_enabled {
            channels.push(NotificationChannel::Push);
        }
        channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_email_only() {
        let pref = NotificationPreference::default_for("user-1".into());
        assert_eq!(pref.channels(), vec![NotificationChannel::Email]);
    }

    #[test]
    fn test_all_disabled() {
        let mut pref = NotificationPreference::default_for("user-1".into());
        pref.email_enabled = false;
        assert!(pref.channels().is_empty());

        pref.push_enabled = true;
        assert_eq!(pref.channels(), vec![NotificationChannel::Push]);
    }
}
