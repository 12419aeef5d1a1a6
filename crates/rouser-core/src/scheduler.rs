//! Tick-driven notification scheduler
//!
//! Each tick evaluates every tracked item against four independent rules
//! (daily-reset, sleep-corrected cycle, mandatory time, plain cycle deadline)
//! and emits at most one notification per logical event. Dedup keys advance
//! even when delivery fails.

use chrono::{DateTime, Local, Timelike};
use rouser_api::{
    ActionKind, NotificationRequest, Notifier, Preferences, RunningSet, Status, TrackedItem,
};
use rouser_store::{Store, StoreResult};
use rouser_util::{advance_hours, format_remaining, local_at, ItemId, TimeOfDay};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{cycle_deadline, determine_status, next_sleep_period, server_day_start, SchedulerMemory};

/// Stateful notification scheduler.
///
/// Owns only its dedup memory; items and preferences live in the store, the
/// running set comes from the process observer, and delivery goes through the
/// notifier. All state mutation happens on the tick thread.
pub struct Scheduler {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    running: Arc<dyn RunningSet>,
    memory: SchedulerMemory,
    status_listener: Option<Box<dyn Fn() + Send + Sync>>,
}

impl Scheduler {
    pub fn new(
        store: Arc<dyn Store>,
        notifier: Arc<dyn Notifier>,
        running: Arc<dyn RunningSet>,
    ) -> Self {
        Self {
            store,
            notifier,
            running,
            memory: SchedulerMemory::new(),
            status_listener: None,
        }
    }

    /// Register a callback invoked at most once per tick when any item's
    /// status changed during the tick.
    pub fn on_status_changed(&mut self, listener: impl Fn() + Send + Sync + 'static) {
        self.status_listener = Some(Box::new(listener));
    }

    /// Current status of every item, in store order.
    pub fn statuses(&self, now: DateTime<Local>) -> StoreResult<Vec<(TrackedItem, Status)>> {
        let prefs = self.store.get_preferences()?;
        let items = self.store.get_items()?;
        let running = self.running.current_running_item_ids();

        Ok(items
            .into_iter()
            .map(|item| {
                let status = determine_status(&item, now, &prefs, &running);
                (item, status)
            })
            .collect())
    }

    /// Run one evaluation pass. Returns whether any item's status changed
    /// between the start and end of the pass.
    pub fn run_all_checks(&mut self, now: DateTime<Local>) -> bool {
        let prefs = match self.store.get_preferences() {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(error = %e, "Skipping tick: failed to load preferences");
                return false;
            }
        };
        let items = match self.store.get_items() {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Skipping tick: failed to load items");
                return false;
            }
        };
        // One running-set snapshot per tick, taken before any status is computed
        let running = self.running.current_running_item_ids();

        let before = snapshot_statuses(&items, now, &prefs, &running);

        // Sleep-correction records the deadline in the plain-cycle dedup map,
        // so it must run before check_user_cycles.
        self.check_daily_reset_tasks(&items, now, &prefs);
        self.check_sleep_corrected_cycles(&items, now, &prefs);
        self.check_mandatory_times(&items, now, &prefs);
        self.check_user_cycles(&items, now, &prefs);

        // Re-fetch so collaborator writes made during the checks are observed
        let items_after = match self.store.get_items() {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Failed to re-load items for change detection");
                items
            }
        };
        let after = snapshot_statuses(&items_after, now, &prefs, &running);

        let changed = before != after;
        if changed {
            debug!("Item status changed during tick");
            if let Some(listener) = &self.status_listener {
                listener();
            }
        }
        changed
    }

    /// Deliver a notification unless its category toggle is off. Delivery
    /// errors are logged and swallowed; callers mark dedup keys regardless.
    fn deliver(&self, enabled: bool, request: NotificationRequest) {
        if !enabled {
            debug!(title = %request.title, "Notification suppressed by toggle");
            return;
        }
        if let Err(e) = self.notifier.deliver(&request) {
            warn!(title = %request.title, error = %e, "Notification delivery failed");
        }
    }

    /// Mandatory check-in times: fires when the wall-clock minute matches a
    /// configured time-of-day, once per (item, time, calendar day).
    fn check_mandatory_times(
        &mut self,
        items: &[TrackedItem],
        now: DateTime<Local>,
        prefs: &Preferences,
    ) {
        let today = now.date_naive();

        for item in items {
            if !item.mandatory_enabled {
                continue;
            }
            for time_str in &item.mandatory_times {
                let Some(tod) = TimeOfDay::parse(time_str) else {
                    continue;
                };
                if now.hour() != tod.hour as u32 || now.minute() != tod.minute as u32 {
                    continue;
                }

                let key = (item.id.clone(), time_str.clone(), today);
                if self.memory.mandatory_notified.contains(&key) {
                    continue;
                }

                self.deliver(
                    prefs.notify.mandatory,
                    NotificationRequest::new(
                        format!("{}: check-in time", item.name),
                        format!("Scheduled check-in at {}", tod),
                    )
                    .for_item(item.id.clone())
                    .with_action("Launch", ActionKind::Launch),
                );
                self.memory.mandatory_notified.insert(key);
            }
        }
    }

    /// Plain cycle deadlines: fires once per deadline instance, inside the
    /// configured advance-notice window.
    fn check_user_cycles(
        &mut self,
        items: &[TrackedItem],
        now: DateTime<Local>,
        prefs: &Preferences,
    ) {
        for item in items {
            let Some(deadline) = cycle_deadline(item) else {
                continue;
            };

            let notify_start = deadline - advance_hours(prefs.cycle_deadline_advance_hours);
            if !(notify_start <= now && now < deadline) {
                continue;
            }
            if self
                .memory
                .cycle_notified
                .get(&item.id)
                .map_or(false, |notified| *notified >= deadline)
            {
                continue;
            }

            let remaining = deadline - now;
            self.deliver(
                prefs.notify.cycle_deadline,
                NotificationRequest::new(
                    format!("{}: cycle ending soon", item.name),
                    format!(
                        "{} left in the {}h cycle",
                        format_remaining(remaining),
                        item.user_cycle_hours.unwrap_or(0)
                    ),
                )
                .for_item(item.id.clone())
                .with_action("Launch", ActionKind::Launch),
            );
            self.memory.cycle_notified.insert(item.id.clone(), deadline);
        }
    }

    /// Sleep-corrected cycles: a deadline that falls inside the upcoming
    /// sleep period is announced before sleep starts. Also marks the plain
    /// cycle dedup map so the same deadline is not announced twice.
    fn check_sleep_corrected_cycles(
        &mut self,
        items: &[TrackedItem],
        now: DateTime<Local>,
        prefs: &Preferences,
    ) {
        let Some(period) = next_sleep_period(now, &prefs.sleep_start, &prefs.sleep_end) else {
            return;
        };
        let trigger = period.start - advance_hours(prefs.sleep_correction_advance_hours);

        for item in items {
            let Some(deadline) = cycle_deadline(item) else {
                continue;
            };
            if !period.contains(deadline) {
                continue;
            }
            if !(trigger <= now && now < period.start) {
                continue;
            }

            let key = (item.id.clone(), deadline.timestamp());
            if self.memory.sleep_notified.contains(&key) {
                continue;
            }

            self.deliver(
                prefs.notify.sleep_correction,
                NotificationRequest::new(
                    format!("{}: play before sleep", item.name),
                    format!(
                        "The cycle ends at {} while you are asleep; play before {}",
                        deadline.format("%H:%M"),
                        period.start.format("%H:%M"),
                    ),
                )
                .for_item(item.id.clone())
                .with_action("Launch", ActionKind::Launch),
            );
            self.memory.sleep_notified.insert(key);
            self.memory.cycle_notified.insert(item.id.clone(), deadline);
        }
    }

    /// Daily-reset reminders: near the end of a server day in which the item
    /// was never played.
    fn check_daily_reset_tasks(
        &mut self,
        items: &[TrackedItem],
        now: DateTime<Local>,
        prefs: &Preferences,
    ) {
        for item in items {
            let Some(reset) = item
                .server_reset_time
                .as_deref()
                .and_then(TimeOfDay::parse)
            else {
                continue;
            };
            let Some(window_start) = server_day_start(now, reset) else {
                continue;
            };
            let Some(next_day) = window_start.date_naive().succ_opt() else {
                continue;
            };
            let Some(window_end) = local_at(next_day, reset) else {
                continue;
            };

            let key = (item.id.clone(), window_start.date_naive());
            if self.memory.daily_reset_notified.contains(&key) {
                continue;
            }

            if item.last_played.map_or(false, |played| played >= window_start) {
                // Already played this server day; nothing to remind
                self.memory.daily_reset_notified.insert(key);
                continue;
            }

            let remind_from =
                window_end - advance_hours(prefs.daily_reset_reminder_advance_hours);
            if now >= remind_from && now < window_end {
                self.deliver(
                    prefs.notify.daily_reset,
                    NotificationRequest::new(
                        format!("{}: daily reset soon", item.name),
                        format!(
                            "Not played today; the server resets at {}",
                            window_end.format("%H:%M"),
                        ),
                    )
                    .for_item(item.id.clone())
                    .with_action("Launch", ActionKind::Launch),
                );
                self.memory.daily_reset_notified.insert(key);
            }
        }
    }
}

fn snapshot_statuses(
    items: &[TrackedItem],
    now: DateTime<Local>,
    prefs: &Preferences,
    running: &HashSet<ItemId>,
) -> HashMap<ItemId, Status> {
    items
        .iter()
        .map(|item| (item.id.clone(), determine_status(item, now, prefs, running)))
        .collect()
}
