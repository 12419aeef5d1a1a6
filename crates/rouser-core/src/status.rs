//! Per-item status determination
//!
//! `determine_status` is a pure function: (item, now, preferences, running
//! set) in, one of {running, incomplete, completed} out. Rules are evaluated
//! in a fixed order and the first one that trips wins; a malformed "HH:MM"
//! field makes the rule that needed it inapplicable rather than an error.

use chrono::{DateTime, Duration, Local};
use rouser_api::{Preferences, Status, TrackedItem};
use rouser_util::{advance_hours, local_at, ItemId, TimeOfDay};
use std::collections::HashSet;

use crate::next_sleep_period;

/// Start of the current server day for a reset time-of-day: today's reset
/// instant if `now` is at or past it, otherwise yesterday's.
pub fn server_day_start(now: DateTime<Local>, reset: TimeOfDay) -> Option<DateTime<Local>> {
    let today = local_at(now.date_naive(), reset)?;
    if now >= today {
        Some(today)
    } else {
        local_at(now.date_naive().pred_opt()?, reset)
    }
}

/// The item's cycle deadline, if both cycle hours and a last-played
/// timestamp exist.
pub fn cycle_deadline(item: &TrackedItem) -> Option<DateTime<Local>> {
    let hours = item.user_cycle_hours?;
    let last_played = item.last_played?;
    Some(last_played + Duration::hours(hours as i64))
}

/// Determine an item's status at `now`.
pub fn determine_status(
    item: &TrackedItem,
    now: DateTime<Local>,
    prefs: &Preferences,
    running_ids: &HashSet<ItemId>,
) -> Status {
    // A running item short-circuits everything else
    if running_ids.contains(&item.id) {
        return Status::Running;
    }

    let mut incomplete = false;

    // Rule a: not yet played in the current server day
    if let Some(reset) = item
        .server_reset_time
        .as_deref()
        .and_then(TimeOfDay::parse)
    {
        if let Some(day_start) = server_day_start(now, reset) {
            if item.last_played.map_or(true, |played| played < day_start) {
                incomplete = true;
            }
        }
    }

    // Rule b: a mandatory check-in time has passed without a session
    if !incomplete && item.mandatory_enabled {
        for time_str in &item.mandatory_times {
            let Some(tod) = TimeOfDay::parse(time_str) else {
                continue;
            };
            let Some(instance) = local_at(now.date_naive(), tod) else {
                continue;
            };
            if now >= instance && item.last_played.map_or(true, |played| played < instance) {
                incomplete = true;
                break;
            }
        }
    }

    // Rule c: the recurrence cycle has lapsed
    let deadline = cycle_deadline(item);
    if !incomplete {
        if let Some(deadline) = deadline {
            if now > deadline {
                incomplete = true;
            }
        }
    }

    // Rule d: the deadline is still ahead but falls inside the sleep window,
    // so the item becomes due early enough to act on before sleep
    if !incomplete {
        if let (Some(deadline), Some(played)) = (deadline, item.last_played) {
            if now < deadline {
                if let Some(period) =
                    next_sleep_period(now, &prefs.sleep_start, &prefs.sleep_end)
                {
                    if period.contains(deadline) {
                        let trigger =
                            period.start - advance_hours(prefs.sleep_correction_advance_hours);
                        if now >= trigger && played < trigger {
                            incomplete = true;
                        }
                    }
                }
            }
        }
    }

    if incomplete {
        Status::Incomplete
    } else {
        Status::Completed
    }
}
