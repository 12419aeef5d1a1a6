//! Time utilities for rouser
//!
//! Everything the scheduling rules need is wall-clock based: server resets,
//! mandatory check-ins, and sleep windows are all local times-of-day.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `ROUSER_MOCK_TIME` environment variable can be set
//! to override the system time for all time-sensitive operations. This is
//! useful for testing reset boundaries and sleep-window behavior.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2026-03-01 04:59:00`)
//!
//! Example:
//! ```bash
//! ROUSER_MOCK_TIME="2026-03-01 04:59:00" cargo run
//! ```

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "ROUSER_MOCK_TIME";

/// Cached mock time offset from the real time when the process started.
/// This allows mock time to advance naturally.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                if let Ok(naive_dt) =
                    NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S")
                {
                    if let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() {
                        let real_now = chrono::Local::now();
                        let offset = mock_dt.signed_duration_since(real_now);
                        tracing::info!(
                            mock_time = %mock_time_str,
                            offset_secs = offset.num_seconds(),
                            "Mock time enabled"
                        );
                        return Some(offset);
                    } else {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            "Failed to convert mock time to local timezone"
                        );
                    }
                } else {
                    tracing::warn!(
                        mock_time = %mock_time_str,
                        expected_format = "%Y-%m-%d %H:%M:%S",
                        "Invalid mock time format"
                    );
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
///
/// In release builds, this always returns the real system time.
/// In debug builds, if `ROUSER_MOCK_TIME` is set, this returns a time that
/// advances from the mock time at the same rate as real time.
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    if let Some(offset) = get_mock_time_offset() {
        real_now + offset
    } else {
        real_now
    }
}

/// A local time-of-day in "HH:MM" resolution.
///
/// Scheduling fields (reset times, mandatory times, sleep bounds) are stored
/// as raw "HH:MM" strings and parsed lazily; a malformed string simply makes
/// the rule that needed it inapplicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Parse an "HH:MM" string. Returns None for anything malformed.
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = s.trim().split_once(':')?;
        let hour: u8 = h.parse().ok()?;
        let minute: u8 = m.parse().ok()?;
        Self::new(hour, minute)
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute as u32, 0).unwrap()
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Returns minutes since midnight
    pub fn as_minutes_from_midnight(&self) -> u32 {
        (self.hour as u32) * 60 + self.minute as u32
    }
}

impl PartialOrd for TimeOfDay {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeOfDay {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_minutes_from_midnight()
            .cmp(&other.as_minutes_from_midnight())
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Resolve a time-of-day on a specific local date to an instant.
///
/// Around DST transitions a wall-clock time can be ambiguous or nonexistent;
/// the earliest valid mapping is used, and None is returned only when the
/// time does not exist at all on that date.
pub fn local_at(date: NaiveDate, tod: TimeOfDay) -> Option<DateTime<Local>> {
    Local
        .from_local_datetime(&date.and_time(tod.to_naive_time()))
        .earliest()
}

/// Convert fractional advance-notice hours into a chrono duration.
pub fn advance_hours(hours: f64) -> chrono::Duration {
    chrono::Duration::milliseconds((hours * 3_600_000.0) as i64)
}

/// Format a remaining duration for notification text: hours with one decimal
/// when at least an hour remains, whole minutes otherwise.
pub fn format_remaining(d: chrono::Duration) -> String {
    let minutes = d.num_minutes().max(0);
    if minutes >= 60 {
        format!("{:.1}h", minutes as f64 / 60.0)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn time_of_day_parse_valid() {
        assert_eq!(TimeOfDay::parse("05:00"), TimeOfDay::new(5, 0));
        assert_eq!(TimeOfDay::parse("23:59"), TimeOfDay::new(23, 59));
        assert_eq!(TimeOfDay::parse(" 12:30 "), TimeOfDay::new(12, 30));
    }

    #[test]
    fn time_of_day_parse_malformed() {
        for s in ["", "5", "24:00", "12:60", "ab:cd", "12:00:00", "12-00"] {
            assert!(TimeOfDay::parse(s).is_none(), "expected '{}' to fail", s);
        }
    }

    #[test]
    fn time_of_day_ordering() {
        let morning = TimeOfDay::new(8, 0).unwrap();
        let noon = TimeOfDay::new(12, 0).unwrap();
        let night = TimeOfDay::new(23, 30).unwrap();

        assert!(morning < noon);
        assert!(noon < night);
    }

    #[test]
    fn local_at_resolves_date_and_time() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let tod = TimeOfDay::new(5, 0).unwrap();
        let dt = local_at(date, tod).unwrap();

        assert_eq!(dt.date_naive(), date);
        assert_eq!(dt.hour(), 5);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn advance_hours_fractional() {
        assert_eq!(advance_hours(1.0), chrono::Duration::hours(1));
        assert_eq!(advance_hours(0.5), chrono::Duration::minutes(30));
        assert_eq!(advance_hours(2.5), chrono::Duration::minutes(150));
    }

    #[test]
    fn format_remaining_hours_and_minutes() {
        assert_eq!(format_remaining(chrono::Duration::minutes(90)), "1.5h");
        assert_eq!(format_remaining(chrono::Duration::hours(24)), "24.0h");
        assert_eq!(format_remaining(chrono::Duration::minutes(45)), "45m");
        assert_eq!(format_remaining(chrono::Duration::minutes(-5)), "0m");
    }

    #[test]
    fn now_returns_reasonable_time() {
        let t = now();
        assert!(t.year() >= 2020);
        assert!(t.year() <= 2100);
    }

    #[test]
    fn mock_time_env_var_name() {
        assert_eq!(MOCK_TIME_ENV_VAR, "ROUSER_MOCK_TIME");
    }

    #[test]
    fn mock_time_format_parses() {
        let result = NaiveDateTime::parse_from_str("2026-03-01 04:59:00", "%Y-%m-%d %H:%M:%S");
        assert!(result.is_ok());
    }
}
