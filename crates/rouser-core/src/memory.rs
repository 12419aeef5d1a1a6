//! Scheduler dedup bookkeeping
//!
//! Keys of notifications already emitted this process lifetime. Nothing here
//! is persisted: after a restart the scheduler may re-notify for an event it
//! already announced, which is acceptable by contract.

use chrono::{DateTime, Local, NaiveDate};
use rouser_util::ItemId;
use std::collections::{HashMap, HashSet};

/// Dedup state for all four notification rules
#[derive(Debug, Default)]
pub struct SchedulerMemory {
    /// (item, mandatory time string, calendar day) already notified
    pub mandatory_notified: HashSet<(ItemId, String, NaiveDate)>,

    /// Last cycle deadline each item was notified for
    pub cycle_notified: HashMap<ItemId, DateTime<Local>>,

    /// (item, original deadline epoch seconds) sleep-correction pairs notified
    pub sleep_notified: HashSet<(ItemId, i64)>,

    /// (item, server-day date) already handled for the daily-reset reminder
    pub daily_reset_notified: HashSet<(ItemId, NaiveDate)>,
}

impl SchedulerMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all dedup state (e.g. after the item collection is replaced)
    pub fn reset(&mut self) {
        self.mandatory_notified.clear();
        self.cycle_notified.clear();
        self.sleep_notified.clear();
        self.daily_reset_notified.clear();
    }
}
