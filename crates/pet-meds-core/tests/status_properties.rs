//! Property tests for derived reminder statuses.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use proptest::prelude::*;

use pet_meds_core::models::ReminderStatus;
use pet_meds_core::status::{
    derive_status, group_by_time_of_day, local_day_bounds, time_of_day, within_due_now_window,
    DerivedStatus, TimeOfDay,
};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    // Roughly two years of seconds
    (0i64..63_000_000).prop_map(|secs| base() + Duration::seconds(secs))
}

fn offset() -> impl Strategy<Value = FixedOffset> {
    (-12 * 60..=14 * 60i32).prop_map(|m| FixedOffset::east_opt(m * 60).unwrap())
}

proptest! {
    #[test]
    fn pending_in_the_past_is_overdue(now in instant(), late_secs in 1i64..10_000_000) {
        let scheduled = now - Duration::seconds(late_secs);
        let info = derive_status(scheduled, now, ReminderStatus::Pending);
        prop_assert_eq!(info.status, DerivedStatus::Overdue);
        prop_assert_eq!(info.minutes_late, Some(late_secs / 60));
        prop_assert_eq!(info.minutes_until, None);
    }

    #[test]
    fn completed_status_ignores_time(scheduled in instant(), now in instant(), given in any::<bool>()) {
        let (persisted, expected) = if given {
            (ReminderStatus::Given, DerivedStatus::Given)
        } else {
            (ReminderStatus::Missed, DerivedStatus::Missed)
        };
        let info = derive_status(scheduled, now, persisted);
        prop_assert_eq!(info.status, expected);
        prop_assert_eq!(info.minutes_late, None);
        prop_assert_eq!(info.minutes_until, None);
    }

    #[test]
    fn pending_future_bands(now in instant(), ahead_secs in 0i64..1_000_000) {
        let scheduled = now + Duration::seconds(ahead_secs);
        let status = derive_status(scheduled, now, ReminderStatus::Pending).status;
        let expected = if ahead_secs <= 30 * 60 {
            DerivedStatus::DueNow
        } else if ahead_secs <= 120 * 60 {
            DerivedStatus::DueSoon
        } else {
            DerivedStatus::Scheduled
        };
        prop_assert_eq!(status, expected);
    }

    #[test]
    fn due_now_window_is_symmetric(now in instant(), delta_secs in -10_000i64..10_000) {
        let later = within_due_now_window(now + Duration::seconds(delta_secs), now);
        let earlier = within_due_now_window(now - Duration::seconds(delta_secs), now);
        prop_assert_eq!(later, earlier);
        prop_assert_eq!(later, delta_secs.abs() <= 30 * 60);
    }

    #[test]
    fn local_day_contains_now(now in instant(), tz in offset()) {
        let (start, end) = local_day_bounds(now, &tz);
        prop_assert!(start <= now && now < end);
        prop_assert_eq!(end - start, Duration::days(1));
        prop_assert_eq!(time_of_day(&start, &tz), TimeOfDay::Morning);
    }

    #[test]
    fn grouping_keeps_every_item_in_order(times in prop::collection::vec(instant(), 0..40), tz in offset()) {
        let groups = group_by_time_of_day(times.clone(), &tz, |t| *t);
        prop_assert_eq!(groups.len(), times.len());

        for (period, items) in groups.iter() {
            prop_assert!(items.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(items.iter().all(|t| time_of_day(t, &tz) == period));
        }
    }
}
