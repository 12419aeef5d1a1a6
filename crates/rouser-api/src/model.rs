//! Data model shared across rouser components

use chrono::{DateTime, Local};
use rouser_util::ItemId;
use serde::{Deserialize, Serialize};

/// Computed visual status of a tracked item at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The item's process is currently running
    Running,
    /// At least one scheduling rule says the item is due
    Incomplete,
    /// Nothing is due right now
    Completed,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Running => "running",
            Status::Incomplete => "incomplete",
            Status::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// One monitored application with its scheduling configuration.
///
/// Time-of-day fields are raw "HH:MM" strings; malformed values silently
/// disable the rule that would have used them. `last_played` is only ever
/// advanced by observed session-end events, never rolled back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedItem {
    /// Unique stable ID
    pub id: ItemId,

    /// Display label
    pub name: String,

    /// Executable name the process watcher matches
    #[serde(default)]
    pub process_name: Option<String>,

    /// argv for the one-shot launch helper
    #[serde(default)]
    pub launch: Option<Vec<String>>,

    /// Daily server reset time ("HH:MM"), if the provider has one
    #[serde(default)]
    pub server_reset_time: Option<String>,

    /// Whether mandatory check-in times are enforced
    #[serde(default)]
    pub mandatory_enabled: bool,

    /// Ordered mandatory check-in times ("HH:MM")
    #[serde(default)]
    pub mandatory_times: Vec<String>,

    /// Revisit within this many hours of the last session
    #[serde(default)]
    pub user_cycle_hours: Option<u32>,

    /// Last observed session end
    #[serde(default)]
    pub last_played: Option<DateTime<Local>>,
}

impl TrackedItem {
    /// Create an item with only the required fields set
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            process_name: None,
            launch: None,
            server_reset_time: None,
            mandatory_enabled: false,
            mandatory_times: Vec::new(),
            user_cycle_hours: None,
            last_played: None,
        }
    }
}

/// Per-category notification toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyToggles {
    pub mandatory: bool,
    pub cycle_deadline: bool,
    pub sleep_correction: bool,
    pub daily_reset: bool,
    pub launch_success: bool,
    pub launch_failure: bool,
}

impl Default for NotifyToggles {
    fn default() -> Self {
        Self {
            mandatory: true,
            cycle_deadline: true,
            sleep_correction: true,
            daily_reset: true,
            launch_success: true,
            launch_failure: true,
        }
    }
}

/// Global user preferences. Single process-wide instance, mutated only by an
/// explicit settings save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Nightly sleep window start ("HH:MM"); may wrap past midnight
    pub sleep_start: String,

    /// Nightly sleep window end ("HH:MM")
    pub sleep_end: String,

    /// Hours before sleep-start at which a sleep-corrected reminder fires
    pub sleep_correction_advance_hours: f64,

    /// Hours before a cycle deadline at which the plain reminder fires
    pub cycle_deadline_advance_hours: f64,

    /// Hours before a server-day boundary at which the "haven't played today"
    /// reminder fires
    pub daily_reset_reminder_advance_hours: f64,

    /// Per-category toggles
    pub notify: NotifyToggles,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sleep_start: "23:00".into(),
            sleep_end: "07:00".into(),
            sleep_correction_advance_hours: 1.0,
            cycle_deadline_advance_hours: 1.0,
            daily_reset_reminder_advance_hours: 1.0,
            notify: NotifyToggles::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_roundtrips_through_json() {
        let mut item = TrackedItem::new("genshin", "Genshin Impact");
        item.server_reset_time = Some("05:00".into());
        item.user_cycle_hours = Some(24);

        let json = serde_json::to_string(&item).unwrap();
        let parsed: TrackedItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, parsed);
    }

    #[test]
    fn item_json_defaults_optional_fields() {
        let parsed: TrackedItem =
            serde_json::from_str(r#"{"id":"x","name":"X"}"#).unwrap();
        assert!(parsed.server_reset_time.is_none());
        assert!(!parsed.mandatory_enabled);
        assert!(parsed.mandatory_times.is_empty());
        assert!(parsed.last_played.is_none());
    }

    #[test]
    fn preferences_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.sleep_start, "23:00");
        assert_eq!(prefs.sleep_end, "07:00");
        assert_eq!(prefs.daily_reset_reminder_advance_hours, 1.0);
        assert!(prefs.notify.mandatory);
        assert!(prefs.notify.daily_reset);
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::Running.to_string(), "running");
        assert_eq!(Status::Incomplete.to_string(), "incomplete");
        assert_eq!(Status::Completed.to_string(), "completed");
    }
}
