//! Sleep-period math
//!
//! The sleep-correction rules need the sleep period that contains `now`, or
//! the next one if the user is currently awake. The window is a pair of local
//! times-of-day and may wrap past midnight (e.g. 23:00 -> 07:00).

use chrono::{DateTime, Local};
use rouser_util::{local_at, TimeOfDay};

/// One concrete nightly sleep period, resolved to instants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepPeriod {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl SleepPeriod {
    /// Whether an instant falls inside this period (start inclusive,
    /// end exclusive)
    pub fn contains(&self, instant: DateTime<Local>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Compute the sleep period containing or next following `now`.
///
/// Returns None when either time-of-day string is unparseable. Pure function
/// of its inputs; day arithmetic uses calendar dates so the bounds stay at
/// the configured wall-clock times across DST transitions.
pub fn next_sleep_period(
    now: DateTime<Local>,
    sleep_start: &str,
    sleep_end: &str,
) -> Option<SleepPeriod> {
    let start = TimeOfDay::parse(sleep_start)?;
    let end = TimeOfDay::parse(sleep_end)?;

    let today = now.date_naive();

    if start > end {
        // Overnight window, e.g. 23:00 -> 07:00
        let start_today = local_at(today, start)?;
        let end_today = local_at(today, end)?;

        if now >= start_today {
            // Evening portion: started today, ends tomorrow morning
            Some(SleepPeriod {
                start: start_today,
                end: local_at(today.succ_opt()?, end)?,
            })
        } else if now < end_today {
            // Morning portion: started yesterday evening
            Some(SleepPeriod {
                start: local_at(today.pred_opt()?, start)?,
                end: end_today,
            })
        } else {
            // Daytime gap: next period starts tonight
            Some(SleepPeriod {
                start: start_today,
                end: local_at(today.succ_opt()?, end)?,
            })
        }
    } else {
        // Same-day window, e.g. 00:00 -> 08:00
        let start_today = local_at(today, start)?;
        let end_today = local_at(today, end)?;

        if now < end_today {
            // Inside the window or before it: today's window
            Some(SleepPeriod {
                start: start_today,
                end: end_today,
            })
        } else {
            // Past today's window: tomorrow's
            Some(SleepPeriod {
                start: local_at(today.succ_opt()?, start)?,
                end: local_at(today.succ_opt()?, end)?,
            })
        }
    }
}
