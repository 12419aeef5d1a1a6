//! Validated configuration structures

use crate::schema::{RawConfig, RawDaemonConfig, RawItem, RawNotifyToggles, RawPreferences};
use rouser_api::{NotifyToggles, Preferences, TrackedItem};
use rouser_util::ItemId;
use std::path::PathBuf;
use std::time::Duration;

/// Validated configuration ready for use by the daemon
#[derive(Debug, Clone)]
pub struct Config {
    /// Daemon settings
    pub daemon: DaemonConfig,

    /// Preference defaults (applied to the store on first run)
    pub preferences: Preferences,

    /// Tracked item definitions (seeded into the store at startup)
    pub items: Vec<TrackedItem>,
}

impl Config {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            daemon: DaemonConfig::from_raw(raw.daemon),
            preferences: raw
                .preferences
                .map(convert_preferences)
                .unwrap_or_default(),
            items: raw.items.into_iter().map(convert_item).collect(),
        }
    }

    /// Get an item definition by ID
    pub fn get_item(&self, id: &ItemId) -> Option<&TrackedItem> {
        self.items.iter().find(|i| &i.id == id)
    }
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub tick_interval: Duration,
    pub status_refresh: Duration,
}

impl DaemonConfig {
    fn from_raw(raw: RawDaemonConfig) -> Self {
        Self {
            data_dir: raw
                .data_dir
                .unwrap_or_else(rouser_util::data_dir_without_env),
            log_dir: raw.log_dir.unwrap_or_else(rouser_util::default_log_dir),
            tick_interval: Duration::from_secs(raw.tick_interval_secs.unwrap_or(1).max(1)),
            status_refresh: Duration::from_secs(raw.status_refresh_secs.unwrap_or(30).max(1)),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self::from_raw(RawDaemonConfig::default())
    }
}

fn convert_item(raw: RawItem) -> TrackedItem {
    TrackedItem {
        id: ItemId::new(raw.id),
        name: raw.name,
        process_name: raw.process_name,
        launch: raw.launch,
        server_reset_time: raw.server_reset_time,
        mandatory_enabled: raw.mandatory_enabled,
        mandatory_times: raw.mandatory_times,
        user_cycle_hours: raw.cycle_hours,
        // Play history is owned by the store, never by the config
        last_played: None,
    }
}

fn convert_preferences(raw: RawPreferences) -> Preferences {
    let defaults = Preferences::default();
    Preferences {
        sleep_start: raw.sleep_start.unwrap_or(defaults.sleep_start),
        sleep_end: raw.sleep_end.unwrap_or(defaults.sleep_end),
        sleep_correction_advance_hours: raw
            .sleep_correction_advance_hours
            .unwrap_or(defaults.sleep_correction_advance_hours),
        cycle_deadline_advance_hours: raw
            .cycle_deadline_advance_hours
            .unwrap_or(defaults.cycle_deadline_advance_hours),
        daily_reset_reminder_advance_hours: raw
            .daily_reset_reminder_advance_hours
            .unwrap_or(defaults.daily_reset_reminder_advance_hours),
        notify: raw.notify.map(convert_toggles).unwrap_or_default(),
    }
}

fn convert_toggles(raw: RawNotifyToggles) -> NotifyToggles {
    let defaults = NotifyToggles::default();
    NotifyToggles {
        mandatory: raw.mandatory.unwrap_or(defaults.mandatory),
        cycle_deadline: raw.cycle_deadline.unwrap_or(defaults.cycle_deadline),
        sleep_correction: raw.sleep_correction.unwrap_or(defaults.sleep_correction),
        daily_reset: raw.daily_reset.unwrap_or(defaults.daily_reset),
        launch_success: raw.launch_success.unwrap_or(defaults.launch_success),
        launch_failure: raw.launch_failure.unwrap_or(defaults.launch_failure),
    }
}
