//! Store trait definitions

use chrono::{DateTime, Local};
use rouser_api::{Preferences, TrackedItem};
use rouser_util::ItemId;

use crate::StoreResult;

/// Main store trait
pub trait Store: Send + Sync {
    // Tracked items

    /// Get all tracked items in stable (insertion) order
    fn get_items(&self) -> StoreResult<Vec<TrackedItem>>;

    /// Get one item by ID
    fn get_item(&self, id: &ItemId) -> StoreResult<Option<TrackedItem>>;

    /// Insert or replace an item
    fn upsert_item(&self, item: &TrackedItem) -> StoreResult<()>;

    /// Advance an item's last-played timestamp.
    ///
    /// The timestamp is monotonic: an update older than the stored value is
    /// ignored. Returns whether the value actually advanced.
    fn update_last_played(
        &self,
        id: &ItemId,
        played_at: DateTime<Local>,
    ) -> StoreResult<bool>;

    /// Delete an item
    fn delete_item(&self, id: &ItemId) -> StoreResult<()>;

    // Preferences

    /// Get global preferences (defaults if never saved)
    fn get_preferences(&self) -> StoreResult<Preferences>;

    /// Save global preferences
    fn save_preferences(&self, prefs: &Preferences) -> StoreResult<()>;

    // Health

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}
