//! In-memory notifier that records what it was asked to send.

use std::collections::HashSet;
use std::sync::Mutex;

use super::{Notification, Notifier, NotifyError, NotifyResult};
use crate::models::NotificationChannel;

/// Records sent notifications instead of delivering them.
///
/// Each instance owns its own log, so tests using separate instances can run
/// in parallel. `reset` clears the log and any injected failures.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    failing: Mutex<HashSet<NotificationChannel>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send on `channel` fail until the next `reset`.
    pub fn fail_on(&self, channel: NotificationChannel) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(channel);
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn sent_on(&self, channel: NotificationChannel) -> Vec<Notification> {
        self.sent()
            .into_iter()
            .filter(|n| n.channel == channel)
            .collect()
    }

    pub fn reset(&self) {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.failing.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, notification: &Notification) -> NotifyResult<()> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&notification.channel);
        if failing {
            return Err(NotifyError::Transport(format!(
                "{} delivery failed",
                notification.channel.as_str()
            )));
        }
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification.clone());
        Ok(())
    }
}
