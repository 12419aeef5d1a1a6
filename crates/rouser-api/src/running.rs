//! Running-set contract consumed by the status engine

use rouser_util::ItemId;
use std::collections::HashSet;
use std::sync::Mutex;

/// Process-observer collaborator: reports which items are currently running.
///
/// The core never enumerates processes itself; it snapshots this set once per
/// tick before evaluating statuses.
pub trait RunningSet: Send + Sync {
    fn current_running_item_ids(&self) -> HashSet<ItemId>;
}

/// Fixed running set for tests and for embedding without a process watcher.
#[derive(Default)]
pub struct FixedRunningSet {
    ids: Mutex<HashSet<ItemId>>,
}

impl FixedRunningSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_running(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            ids: Mutex::new(ids.into_iter().collect()),
        }
    }

    pub fn set_running(&self, id: ItemId, running: bool) {
        let mut ids = self.ids.lock().unwrap();
        if running {
            ids.insert(id);
        } else {
            ids.remove(&id);
        }
    }
}

impl RunningSet for FixedRunningSet {
    fn current_running_item_ids(&self) -> HashSet<ItemId> {
        self.ids.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_set_tracks_membership() {
        let set = FixedRunningSet::new();
        assert!(set.current_running_item_ids().is_empty());

        set.set_running(ItemId::new("genshin"), true);
        assert!(set.current_running_item_ids().contains(&ItemId::new("genshin")));

        set.set_running(ItemId::new("genshin"), false);
        assert!(set.current_running_item_ids().is_empty());
    }
}
