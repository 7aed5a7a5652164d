//! Read-time reminder status.
//!
//! Pure classification of a reminder from `(scheduled_time, now, persisted status)`.
//! Nothing here touches the database or the wall clock unless asked to.
//!
//! Pending reminders fall into the first matching band:
//!
//! ```text
//!   now > scheduled            → overdue   (minutes_late)
//!   |scheduled - now| <= 30m   → due-now   (minutes_until)
//!   scheduled - now <= 120m    → due-soon  (minutes_until)
//!   otherwise                  → scheduled (minutes_until)
//! ```
//!
//! The due-now window is symmetric, so a reminder a few minutes late is both
//! `overdue` and inside the due-now window. Overdue wins for display;
//! [`within_due_now_window`] exposes the numeric window on its own.

mod grouping;

pub use grouping::*;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ReminderStatus;

/// Default half-width of the due-now window, in minutes.
pub const DUE_NOW_MINUTES: i64 = 30;
/// Default upper edge of the due-soon window, in minutes.
pub const DUE_SOON_MINUTES: i64 = 120;
/// Largest accepted window, one day.
pub const MAX_WINDOW_MINUTES: i64 = 24 * 60;

/// Display status of a reminder. Never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DerivedStatus {
    Scheduled,
    DueSoon,
    DueNow,
    Overdue,
    Given,
    Missed,
}

impl DerivedStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DerivedStatus::Scheduled => "scheduled",
            DerivedStatus::DueSoon => "due-soon",
            DerivedStatus::DueNow => "due-now",
            DerivedStatus::Overdue => "overdue",
            DerivedStatus::Given => "given",
            DerivedStatus::Missed => "missed",
        }
    }

    /// Higher is more urgent. Completed reminders rank lowest.
    pub fn urgency_rank(&self) -> u8 {
        match self {
            DerivedStatus::Overdue => 4,
            DerivedStatus::DueNow => 3,
            DerivedStatus::DueSoon => 2,
            DerivedStatus::Scheduled => 1,
            DerivedStatus::Given | DerivedStatus::Missed => 0,
        }
    }

    /// Whether the reminder can still be marked given.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, DerivedStatus::Given | DerivedStatus::Missed)
    }
}

/// Derived status plus the time delta shown next to it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusInfo {
    pub status: DerivedStatus,
    /// Whole minutes past `scheduled_time`; only for `Overdue`
    pub minutes_late: Option<i64>,
    /// Whole minutes until `scheduled_time`; only for pending, not overdue
    pub minutes_until: Option<i64>,
}

impl StatusInfo {
    fn completed(status: DerivedStatus) -> Self {
        Self {
            status,
            minutes_late: None,
            minutes_until: None,
        }
    }
}

/// Window sizes for the pending bands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusWindows {
    pub due_now_minutes: i64,
    pub due_soon_minutes: i64,
}

impl StatusWindows {
    /// Both windows within `0..=MAX_WINDOW_MINUTES`, due-now no wider than due-soon.
    pub fn is_valid(&self) -> bool {
        let range = 0..=MAX_WINDOW_MINUTES;
        range.contains(&self.due_now_minutes)
            && range.contains(&self.due_soon_minutes)
            && self.due_now_minutes <= self.due_soon_minutes
    }

    fn clamped(self) -> Self {
        Self {
            due_now_minutes: self.due_now_minutes.clamp(0, MAX_WINDOW_MINUTES),
            due_soon_minutes: self.due_soon_minutes.clamp(0, MAX_WINDOW_MINUTES),
        }
    }
}

impl Default for StatusWindows {
    fn default() -> Self {
        Self {
            due_now_minutes: DUE_NOW_MINUTES,
            due_soon_minutes: DUE_SOON_MINUTES,
        }
    }
}

/// Status classifier with configurable windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusEngine {
    windows: StatusWindows,
}

impl StatusEngine {
    /// Window sizes are clamped to `0..=MAX_WINDOW_MINUTES`.
    pub fn new(windows: StatusWindows) -> Self {
        Self {
            windows: windows.clamped(),
        }
    }

    pub fn windows(&self) -> StatusWindows {
        self.windows
    }

    /// Classify a reminder at `now`.
    pub fn derive(
        &self,
        scheduled: DateTime<Utc>,
        now: DateTime<Utc>,
        persisted: ReminderStatus,
    ) -> StatusInfo {
        match persisted {
            ReminderStatus::Given => return StatusInfo::completed(DerivedStatus::Given),
            ReminderStatus::Missed => return StatusInfo::completed(DerivedStatus::Missed),
            ReminderStatus::Pending => {}
        }

        if now > scheduled {
            return StatusInfo {
                status: DerivedStatus::Overdue,
                minutes_late: Some((now - scheduled).num_minutes()),
                minutes_until: None,
            };
        }

        let until = scheduled - now;
        let status = if until <= Duration::minutes(self.windows.due_now_minutes) {
            DerivedStatus::DueNow
        } else if until <= Duration::minutes(self.windows.due_soon_minutes) {
            DerivedStatus::DueSoon
        } else {
            DerivedStatus::Scheduled
        };

        StatusInfo {
            status,
            minutes_late: None,
            minutes_until: Some(until.num_minutes()),
        }
    }

    /// Whether `now` is within the due-now window of `scheduled`, on either side.
    pub fn within_due_now_window(&self, scheduled: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let delta_ms = (scheduled - now).num_milliseconds().abs();
        delta_ms <= Duration::minutes(self.windows.due_now_minutes).num_milliseconds()
    }
}

/// Classify with the default windows.
pub fn derive_status(
    scheduled: DateTime<Utc>,
    now: DateTime<Utc>,
    persisted: ReminderStatus,
) -> StatusInfo {
    StatusEngine::default().derive(scheduled, now, persisted)
}

/// Classify against the wall clock.
pub fn derive_status_now(scheduled: DateTime<Utc>, persisted: ReminderStatus) -> StatusInfo {
    derive_status(scheduled, Utc::now(), persisted)
}

/// Due-now window check with the default windows.
pub fn within_due_now_window(scheduled: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    StatusEngine::default().within_due_now_window(scheduled, now)
}
