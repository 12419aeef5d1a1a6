//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Global daemon settings
    #[serde(default)]
    pub daemon: RawDaemonConfig,

    /// Preference defaults applied on first run
    #[serde(default)]
    pub preferences: Option<RawPreferences>,

    /// Tracked items
    #[serde(default)]
    pub items: Vec<RawItem>,
}

/// Daemon-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawDaemonConfig {
    /// Data directory for the store
    pub data_dir: Option<PathBuf>,

    /// Log directory
    pub log_dir: Option<PathBuf>,

    /// Scheduler/watcher tick interval in seconds (default 1)
    pub tick_interval_secs: Option<u64>,

    /// Status log refresh interval in seconds (default 30)
    pub status_refresh_secs: Option<u64>,
}

/// Raw preference defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPreferences {
    /// Sleep window start ("HH:MM")
    pub sleep_start: Option<String>,

    /// Sleep window end ("HH:MM")
    pub sleep_end: Option<String>,

    /// Hours before sleep-start for sleep-corrected reminders
    pub sleep_correction_advance_hours: Option<f64>,

    /// Hours before a cycle deadline for plain reminders
    pub cycle_deadline_advance_hours: Option<f64>,

    /// Hours before a server-day boundary for daily-reset reminders
    pub daily_reset_reminder_advance_hours: Option<f64>,

    /// Per-category toggles
    #[serde(default)]
    pub notify: Option<RawNotifyToggles>,
}

/// Raw notification toggles (missing fields default to enabled)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawNotifyToggles {
    pub mandatory: Option<bool>,
    pub cycle_deadline: Option<bool>,
    pub sleep_correction: Option<bool>,
    pub daily_reset: Option<bool>,
    pub launch_success: Option<bool>,
    pub launch_failure: Option<bool>,
}

/// Raw tracked item definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawItem {
    /// Unique stable ID
    pub id: String,

    /// Display label
    pub name: String,

    /// Executable name the process watcher matches
    pub process_name: Option<String>,

    /// argv for the one-shot launch helper
    pub launch: Option<Vec<String>>,

    /// Daily server reset time ("HH:MM")
    pub server_reset_time: Option<String>,

    /// Whether mandatory check-in times are enforced
    #[serde(default)]
    pub mandatory_enabled: bool,

    /// Mandatory check-in times ("HH:MM")
    #[serde(default)]
    pub mandatory_times: Vec<String>,

    /// Revisit within this many hours of the last session
    pub cycle_hours: Option<u32>,
}
