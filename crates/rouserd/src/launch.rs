//! One-shot launch helper
//!
//! `rouserd --launch <item-id>` spawns the item's configured command detached
//! and exits; the running daemon's watcher picks the process up on its next
//! poll like any other session.

use anyhow::{anyhow, Context, Result};
use rouser_api::{NotificationRequest, Notifier, NotifyToggles, TrackedItem};
use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Spawn the item's launch command, detached from our stdio.
///
/// When a log directory is given, the child's stdout and stderr are captured
/// to `<item_id>_<timestamp>.log` there; otherwise they are discarded.
/// Success or failure is reported through the notifier, subject to the
/// launch toggles; the returned error carries the detail for the exit code.
pub fn launch_item(
    item: &TrackedItem,
    notifier: &dyn Notifier,
    toggles: &NotifyToggles,
    log_dir: Option<&Path>,
) -> Result<()> {
    let argv = item
        .launch
        .as_ref()
        .filter(|argv| !argv.is_empty())
        .ok_or_else(|| anyhow!("item '{}' has no launch command configured", item.id))?;

    let result = spawn_detached(item, argv, log_dir);

    match result {
        Ok(child) => {
            info!(item_id = %item.id, pid = child.id(), "Launched");
            if toggles.launch_success {
                let request = NotificationRequest::new(
                    format!("{}: launched", item.name),
                    "Have a good session".to_string(),
                )
                .for_item(item.id.clone());
                if let Err(e) = notifier.deliver(&request) {
                    warn!(error = %e, "Failed to deliver launch notification");
                }
            }
            Ok(())
        }
        Err(e) => {
            warn!(item_id = %item.id, error = %e, "Launch failed");
            if toggles.launch_failure {
                let request = NotificationRequest::new(
                    format!("{}: launch failed", item.name),
                    e.to_string(),
                )
                .for_item(item.id.clone());
                if let Err(e) = notifier.deliver(&request) {
                    warn!(error = %e, "Failed to deliver launch-failure notification");
                }
            }
            Err(e)
        }
    }
}

fn spawn_detached(
    item: &TrackedItem,
    argv: &[String],
    log_dir: Option<&Path>,
) -> Result<std::process::Child> {
    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]).stdin(Stdio::null());

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {:?}", dir))?;
            let timestamp = rouser_util::now().format("%Y%m%d_%H%M%S");
            let log_path = dir.join(format!("{}_{}.log", item.id, timestamp));
            let log_file = File::create(&log_path)
                .with_context(|| format!("failed to create log file {:?}", log_path))?;
            let stderr_file = log_file
                .try_clone()
                .context("failed to clone log file handle")?;
            command.stdout(log_file).stderr(stderr_file);
        }
        None => {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
    }

    command
        .spawn()
        .with_context(|| format!("failed to spawn '{}'", argv[0]))
}
