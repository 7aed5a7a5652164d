//! Runtime configuration read from the environment.

use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};
use tracing::warn;

use crate::plan::PlanLimits;
use crate::status::{StatusWindows, MAX_WINDOW_MINUTES};

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file used by `PetMedsCore::open`
    pub database_path: String,
    /// Offset of the user's local time from UTC. Decides where "today"
    /// starts and which time-of-day group a reminder falls in.
    pub utc_offset: FixedOffset,
    /// Free-tier caps
    pub plan_limits: PlanLimits,
    /// Due-now and due-soon windows for derived statuses
    pub status_windows: StatusWindows,
}

impl Config {
    pub fn new() -> Self {
        let database_path =
            std::env::var("PET_MEDS_DATABASE_PATH").unwrap_or_else(|_| "pet_meds.db".into());

        let offset_minutes: i32 = env_or("PET_MEDS_UTC_OFFSET_MINUTES", 0);
        let utc_offset = offset_from_minutes(offset_minutes).unwrap_or_else(|| {
            warn!(
                "The given PET_MEDS_UTC_OFFSET_MINUTES: {} is out of range, falling back to UTC.",
                offset_minutes
            );
            utc()
        });

        let defaults = PlanLimits::default();
        let plan_limits = PlanLimits {
            free_pets: env_or("PET_MEDS_FREE_PET_LIMIT", defaults.free_pets),
            free_medications: env_or("PET_MEDS_FREE_MEDICATION_LIMIT", defaults.free_medications),
        };

        let defaults = StatusWindows::default();
        let status_windows = checked_windows(StatusWindows {
            due_now_minutes: env_or("PET_MEDS_DUE_NOW_MINUTES", defaults.due_now_minutes),
            due_soon_minutes: env_or("PET_MEDS_DUE_SOON_MINUTES", defaults.due_soon_minutes),
        });

        Self {
            database_path,
            utc_offset,
            plan_limits,
            status_windows,
        }
    }

    /// Defaults for every setting, ignoring the environment.
    pub fn defaults() -> Self {
        Self {
            database_path: "pet_meds.db".into(),
            utc_offset: utc(),
            plan_limits: PlanLimits::default(),
            status_windows: StatusWindows::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

pub(crate) fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
}

fn checked_windows(windows: StatusWindows) -> StatusWindows {
    if windows.is_valid() {
        return windows;
    }
    warn!(
        "PET_MEDS_DUE_NOW_MINUTES ({}) and PET_MEDS_DUE_SOON_MINUTES ({}) must be within 0..={} with due-now no wider than due-soon, falling back to the default windows.",
        windows.due_now_minutes, windows.due_soon_minutes, MAX_WINDOW_MINUTES
    );
    StatusWindows::default()
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match std::env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                key, raw, default
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::defaults();
        assert_eq!(config.database_path, "pet_meds.db");
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
        assert_eq!(config.plan_limits, PlanLimits::default());
        assert_eq!(config.status_windows.due_now_minutes, 30);
        assert_eq!(config.status_windows.due_soon_minutes, 120);
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(parse_or("PET_MEDS_FREE_PET_LIMIT", "3", 1u32), 3);
        assert_eq!(parse_or("PET_MEDS_FREE_PET_LIMIT", " 4 ", 1u32), 4);
        assert_eq!(parse_or("PET_MEDS_FREE_PET_LIMIT", "lots", 1u32), 1);
        assert_eq!(parse_or("PET_MEDS_FREE_PET_LIMIT", "-2", 1u32), 1);
    }

    #[test]
    fn test_offset_from_minutes() {
        assert_eq!(
            offset_from_minutes(-300).map(|o| o.local_minus_utc()),
            Some(-18_000)
        );
        assert_eq!(
            offset_from_minutes(330).map(|o| o.local_minus_utc()),
            Some(19_800)
        );
        assert!(offset_from_minutes(24 * 60).is_none());
        assert!(offset_from_minutes(i32::MAX).is_none());
    }

    #[test]
    fn test_checked_windows() {
        let custom = StatusWindows {
            due_now_minutes: 15,
            due_soon_minutes: 60,
        };
        assert_eq!(checked_windows(custom), custom);

        for (due_now_minutes, due_soon_minutes) in [
            (i64::MAX, i64::MAX),
            (-5, 120),
            (30, 10_000),
            (90, 60),
        ] {
            let windows = checked_windows(StatusWindows {
                due_now_minutes,
                due_soon_minutes,
            });
            assert_eq!(windows, StatusWindows::default());
        }
    }
}
