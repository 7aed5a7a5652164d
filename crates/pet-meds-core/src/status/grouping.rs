//! Local-time helpers: time-of-day grouping and day bounds.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Reminder;

/// Coarse period of the local day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// Before 12:00
    Morning,
    /// 12:00 to 17:59
    Afternoon,
    /// 18:00 onwards
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }
}

/// Period of the day `scheduled` falls in, in the given zone.
pub fn time_of_day<Tz: TimeZone>(scheduled: &DateTime<Utc>, tz: &Tz) -> TimeOfDay {
    TimeOfDay::from_hour(scheduled.with_timezone(tz).hour())
}

/// Items bucketed by time of day, each bucket in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeOfDayGroups<T> {
    pub morning: Vec<T>,
    pub afternoon: Vec<T>,
    pub evening: Vec<T>,
}

impl<T> Default for TimeOfDayGroups<T> {
    fn default() -> Self {
        Self {
            morning: Vec::new(),
            afternoon: Vec::new(),
            evening: Vec::new(),
        }
    }
}

impl<T> TimeOfDayGroups<T> {
    pub fn get(&self, period: TimeOfDay) -> &[T] {
        match period {
            TimeOfDay::Morning => &self.morning,
            TimeOfDay::Afternoon => &self.afternoon,
            TimeOfDay::Evening => &self.evening,
        }
    }

    pub fn len(&self) -> usize {
        self.morning.len() + self.afternoon.len() + self.evening.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-empty groups in display order.
    pub fn iter(&self) -> impl Iterator<Item = (TimeOfDay, &[T])> {
        [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening]
            .into_iter()
            .map(move |period| (period, self.get(period)))
            .filter(|(_, items)| !items.is_empty())
    }
}

/// Bucket items by the local hour of their scheduled time.
///
/// Each bucket is sorted by scheduled time; items with equal times keep
/// their input order.
pub fn group_by_time_of_day<T, Tz, F>(items: Vec<T>, tz: &Tz, scheduled: F) -> TimeOfDayGroups<T>
where
    Tz: TimeZone,
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut groups = TimeOfDayGroups::default();
    for item in items {
        match time_of_day(&scheduled(&item), tz) {
            TimeOfDay::Morning => groups.morning.push(item),
            TimeOfDay::Afternoon => groups.afternoon.push(item),
            TimeOfDay::Evening => groups.evening.push(item),
        }
    }
    groups.morning.sort_by_key(|item| scheduled(item));
    groups.afternoon.sort_by_key(|item| scheduled(item));
    groups.evening.sort_by_key(|item| scheduled(item));
    groups
}

/// Group reminders by time of day.
pub fn group_reminders<Tz: TimeZone>(reminders: Vec<Reminder>, tz: &Tz) -> TimeOfDayGroups<Reminder> {
    group_by_time_of_day(reminders, tz, |r| r.scheduled_time)
}

/// `[start, end)` of the local calendar day containing `now`, in UTC.
pub fn local_day_bounds(now: DateTime<Utc>, offset: &FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let local_date = now.with_timezone(offset).date_naive();
    let local_midnight = local_date.and_time(NaiveTime::default());
    let start = Utc.from_utc_datetime(
        &(local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()))),
    );
    (start, start + Duration::days(1))
}
