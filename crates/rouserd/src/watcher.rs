//! Process watcher
//!
//! Polls the process table once per tick and reports which tracked items are
//! currently running. Start and stop transitions are logged as sessions, and
//! a stop advances the item's last-played timestamp in the store.

use chrono::{DateTime, Local};
use rouser_api::RunningSet;
use rouser_store::{Store, StoreResult};
use rouser_util::{ItemId, SessionId};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Watches the process table for tracked items' executables.
///
/// The running set exposed to the status engine is the snapshot taken by the
/// most recent `poll`, so a tick sees one consistent view.
pub struct ProcessWatcher {
    store: Arc<dyn Store>,
    /// Items seen running in the last poll, with their session IDs
    sessions: Mutex<HashMap<ItemId, ActiveSession>>,
}

struct ActiveSession {
    session_id: SessionId,
    started_at: DateTime<Local>,
}

impl ProcessWatcher {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Scan the process table and reconcile session state.
    ///
    /// A tracked item counts as running when any process's comm (or the
    /// basename of its cmdline argv[0]) matches the item's configured
    /// `process_name`. An item that was running last poll and is gone now has
    /// its session closed and its last-played timestamp advanced to `now`.
    pub fn poll(&self, now: DateTime<Local>) -> StoreResult<()> {
        let items = self.store.get_items()?;
        let names = scan_process_names();

        let mut running_now = HashSet::new();
        for item in &items {
            let Some(process_name) = &item.process_name else {
                continue;
            };
            if process_matches(&names, process_name) {
                running_now.insert(item.id.clone());
            }
        }

        let mut sessions = self.sessions.lock().unwrap();

        // Starts
        for id in &running_now {
            if !sessions.contains_key(id) {
                let session_id = SessionId::new();
                info!(item_id = %id, session_id = %session_id, "Session started");
                sessions.insert(
                    id.clone(),
                    ActiveSession {
                        session_id,
                        started_at: now,
                    },
                );
            }
        }

        // Stops
        let ended: Vec<ItemId> = sessions
            .keys()
            .filter(|id| !running_now.contains(*id))
            .cloned()
            .collect();
        for id in ended {
            if let Some(session) = sessions.remove(&id) {
                let duration = now - session.started_at;
                info!(
                    item_id = %id,
                    session_id = %session.session_id,
                    duration_secs = duration.num_seconds(),
                    "Session ended"
                );
                match self.store.update_last_played(&id, now) {
                    Ok(true) => {}
                    Ok(false) => {
                        warn!(item_id = %id, "Session end did not advance last-played timestamp");
                    }
                    Err(e) => {
                        warn!(item_id = %id, error = %e, "Failed to record session end");
                    }
                }
            }
        }

        Ok(())
    }
}

impl RunningSet for ProcessWatcher {
    fn current_running_item_ids(&self) -> HashSet<ItemId> {
        self.sessions.lock().unwrap().keys().cloned().collect()
    }
}

/// A tracked executable matches a process when the names are equal, or when
/// the process comm is a kernel-truncated (15 byte) prefix of it.
fn process_matches(names: &HashSet<String>, process_name: &str) -> bool {
    if names.contains(process_name) {
        return true;
    }
    match process_name.get(..15) {
        Some(truncated) => names.contains(truncated),
        None => false,
    }
}

/// Enumerate the comm and argv[0] basename of every process in `/proc`.
fn scan_process_names() -> HashSet<String> {
    let mut names = HashSet::new();

    let entries = match std::fs::read_dir("/proc") {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Failed to read /proc");
            return names;
        }
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(pid_str) = file_name.to_str() else {
            continue;
        };
        if !pid_str.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }

        let proc_path = entry.path();

        if let Ok(comm) = std::fs::read_to_string(proc_path.join("comm")) {
            let comm = comm.trim();
            if !comm.is_empty() {
                names.insert(comm.to_string());
            }
        }

        // cmdline has the full argv[0], not truncated like comm
        if let Ok(cmdline) = std::fs::read(proc_path.join("cmdline")) {
            if let Some(argv0) = cmdline.split(|b| *b == 0).next() {
                let argv0 = String::from_utf8_lossy(argv0);
                if let Some(base) = Path::new(argv0.as_ref()).file_name() {
                    names.insert(base.to_string_lossy().into_owned());
                }
            }
        }
    }

    names
}
