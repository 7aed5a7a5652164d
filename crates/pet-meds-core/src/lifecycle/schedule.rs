//! When a medication's next reminder falls.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};

/// First instant at local `timing` that is not earlier than `now`.
///
/// Today's slot if it has not passed yet, otherwise tomorrow's.
pub fn next_occurrence(timing: NaiveTime, now: DateTime<Utc>, offset: &FixedOffset) -> DateTime<Utc> {
    let local_date = now.with_timezone(offset).date_naive();
    let offset_secs = Duration::seconds(i64::from(offset.local_minus_utc()));
    let today = Utc.from_utc_datetime(&(local_date.and_time(timing) - offset_secs));

    if today >= now {
        today
    } else {
        today + Duration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, hour, min, 0).unwrap()
    }

    fn hm(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    #[test]
    fn test_later_today() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(next_occurrence(hm(18, 0), at(5, 9, 0), &utc), at(5, 18, 0));
    }

    #[test]
    fn test_passed_rolls_to_tomorrow() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(next_occurrence(hm(8, 0), at(5, 9, 0), &utc), at(6, 8, 0));
    }

    #[test]
    fn test_exactly_now_is_today() {
        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(next_occurrence(hm(9, 0), at(5, 9, 0), &utc), at(5, 9, 0));
    }

    #[test]
    fn test_uses_local_date() {
        // 23:00 UTC on the 5th is 08:00 on the 6th at UTC+9
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        // 09:00 local on the 6th is 00:00 UTC on the 6th
        assert_eq!(next_occurrence(hm(9, 0), at(5, 23, 0), &tokyo), at(6, 0, 0));
        // 07:00 local on the 6th has passed, so 07:00 local on the 7th
        assert_eq!(next_occurrence(hm(7, 0), at(5, 23, 0), &tokyo), at(6, 22, 0));
    }
}
