//! Integration tests for rouserd
//!
//! These tests verify the end-to-end behavior of the daemon's components:
//! config parsing into a seedable store, the scheduler's reminder rules over
//! a realistic day, and on-disk persistence of play history.

use chrono::{DateTime, Duration, Local, TimeZone};
use rouser_api::{FixedRunningSet, Preferences, RecordingNotifier, Status, TrackedItem};
use rouser_config::parse_config;
use rouser_core::Scheduler;
use rouser_store::{SqliteStore, Store};
use rouser_util::ItemId;
use std::sync::Arc;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

const TEST_CONFIG: &str = r#"
    config_version = 1

    [preferences]
    sleep_start = "23:00"
    sleep_end = "07:00"

    [[items]]
    id = "genshin"
    name = "Genshin Impact"
    process_name = "GenshinImpact.exe"
    server_reset_time = "05:00"
    mandatory_enabled = true
    mandatory_times = ["12:00", "20:00"]
    cycle_hours = 24

    [[items]]
    id = "hsr"
    name = "Honkai: Star Rail"
    server_reset_time = "04:00"
"#;

fn seeded_store() -> Arc<SqliteStore> {
    let config = parse_config(TEST_CONFIG).unwrap();
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    for item in &config.items {
        store.upsert_item(item).unwrap();
    }
    store.save_preferences(&config.preferences).unwrap();
    store
}

#[test]
fn test_config_parsing() {
    let config = parse_config(TEST_CONFIG).unwrap();

    assert_eq!(config.items.len(), 2);
    let genshin = config.get_item(&ItemId::new("genshin")).unwrap();
    assert_eq!(genshin.mandatory_times.len(), 2);
    assert_eq!(genshin.user_cycle_hours, Some(24));
    assert!(genshin.last_played.is_none());

    assert_eq!(config.preferences.sleep_start, "23:00");
    assert!(config.preferences.notify.mandatory);
}

#[test]
fn test_mandatory_reminders_through_a_day() {
    let store = seeded_store();
    let notifier = Arc::new(RecordingNotifier::new());
    let running = Arc::new(FixedRunningSet::new());
    let mut scheduler = Scheduler::new(store.clone(), notifier.clone(), running);

    // Quiet morning
    scheduler.run_all_checks(at(2026, 3, 1, 9, 0));
    assert_eq!(notifier.delivered_count(), 0);

    // Noon: first mandatory time for genshin only
    scheduler.run_all_checks(at(2026, 3, 1, 12, 0));
    assert_eq!(notifier.delivered_count(), 1);
    assert_eq!(
        notifier.delivered()[0].item_id,
        Some(ItemId::new("genshin"))
    );

    // Repeated ticks within the same minute are deduped
    scheduler.run_all_checks(at(2026, 3, 1, 12, 0) + Duration::seconds(30));
    assert_eq!(notifier.delivered_count(), 1);

    // Evening: second mandatory time
    scheduler.run_all_checks(at(2026, 3, 1, 20, 0));
    assert_eq!(notifier.delivered_count(), 2);
}

#[test]
fn test_daily_reset_reminder_when_unplayed() {
    let store = seeded_store();
    let notifier = Arc::new(RecordingNotifier::new());
    let running = Arc::new(FixedRunningSet::new());
    let mut scheduler = Scheduler::new(store.clone(), notifier.clone(), running);

    // hsr resets at 04:00 and was never played; at 03:30 the reminder is due.
    // genshin resets at 05:00, so only one reminder fires at this instant.
    scheduler.run_all_checks(at(2026, 3, 2, 3, 30));

    let delivered = notifier.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].item_id, Some(ItemId::new("hsr")));
    assert!(delivered[0].message.contains("04:00"));

    // An hour later genshin's boundary is close too
    scheduler.run_all_checks(at(2026, 3, 2, 4, 30));
    assert_eq!(notifier.delivered_count(), 2);
}

#[test]
fn test_play_session_silences_reset_reminder() {
    let store = seeded_store();
    let notifier = Arc::new(RecordingNotifier::new());
    let running = Arc::new(FixedRunningSet::new());
    let mut scheduler = Scheduler::new(store.clone(), notifier.clone(), running);

    // A session ends during hsr's server day (04:00 on March 1 to 04:00 on
    // March 2)
    store
        .update_last_played(&ItemId::new("hsr"), at(2026, 3, 1, 21, 0))
        .unwrap();

    scheduler.run_all_checks(at(2026, 3, 2, 3, 30));
    assert_eq!(notifier.delivered_count(), 0);
}

#[test]
fn test_cycle_reminder_with_sleep_correction() {
    let store = seeded_store();
    let notifier = Arc::new(RecordingNotifier::new());
    let running = Arc::new(FixedRunningSet::new());
    let mut scheduler = Scheduler::new(store.clone(), notifier.clone(), running);

    // Played at 23:30 last night; the 24h cycle ends at 23:30 tonight, which
    // is inside the 23:00-07:00 sleep window. The corrected reminder fires an
    // hour before sleep starts.
    store
        .update_last_played(&ItemId::new("genshin"), at(2026, 2, 28, 23, 30))
        .unwrap();

    // 21:00 is before the corrected trigger at 22:00
    scheduler.run_all_checks(at(2026, 3, 1, 21, 0));
    assert_eq!(notifier.delivered_count(), 0);

    scheduler.run_all_checks(at(2026, 3, 1, 22, 15));
    let delivered = notifier.delivered();
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].title.contains("play before sleep"));

    // The plain cycle reminder for the same deadline stays suppressed
    scheduler.run_all_checks(at(2026, 3, 1, 22, 45));
    assert_eq!(notifier.delivered_count(), 1);
}

#[test]
fn test_running_item_reports_running_status() {
    let store = seeded_store();
    let notifier = Arc::new(RecordingNotifier::new());
    let running = Arc::new(FixedRunningSet::new());
    let scheduler = Scheduler::new(store, notifier, running.clone());

    let now = at(2026, 3, 1, 12, 30);
    let statuses = scheduler.statuses(now).unwrap();
    assert_eq!(statuses.len(), 2);
    // Neither has been played today, so both are incomplete
    assert!(statuses.iter().all(|(_, s)| *s == Status::Incomplete));

    running.set_running(ItemId::new("genshin"), true);
    let statuses = scheduler.statuses(now).unwrap();
    let genshin = statuses
        .iter()
        .find(|(item, _)| item.id == ItemId::new("genshin"))
        .unwrap();
    assert_eq!(genshin.1, Status::Running);
}

#[test]
fn test_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("rouser.db");

    let played_at = at(2026, 3, 1, 21, 0);
    {
        let store = SqliteStore::open(&db_path).unwrap();
        let mut item = TrackedItem::new("genshin", "Genshin Impact");
        item.server_reset_time = Some("05:00".into());
        store.upsert_item(&item).unwrap();
        store
            .update_last_played(&ItemId::new("genshin"), played_at)
            .unwrap();

        let mut prefs = Preferences::default();
        prefs.sleep_start = "22:30".into();
        store.save_preferences(&prefs).unwrap();
    }

    let store = SqliteStore::open(&db_path).unwrap();
    let item = store.get_item(&ItemId::new("genshin")).unwrap().unwrap();
    assert_eq!(item.last_played, Some(played_at));
    assert_eq!(store.get_preferences().unwrap().sleep_start, "22:30");
}

#[test]
fn test_reseeding_preserves_play_history() {
    // Mirrors the daemon's startup seeding: config item definitions replace
    // stored scheduling fields, but the stored last-played survives.
    let config = parse_config(TEST_CONFIG).unwrap();
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    for item in &config.items {
        store.upsert_item(item).unwrap();
    }

    let played_at = at(2026, 3, 1, 21, 0);
    store
        .update_last_played(&ItemId::new("genshin"), played_at)
        .unwrap();

    // Second startup: re-apply config, carrying over stored history
    let existing = store.get_items().unwrap();
    for item in &config.items {
        let mut seeded = item.clone();
        if let Some(prev) = existing.iter().find(|i| i.id == item.id) {
            seeded.last_played = prev.last_played;
        }
        store.upsert_item(&seeded).unwrap();
    }

    let item = store.get_item(&ItemId::new("genshin")).unwrap().unwrap();
    assert_eq!(item.last_played, Some(played_at));
}
