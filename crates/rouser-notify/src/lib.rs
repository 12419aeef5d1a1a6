//! Desktop notification delivery for rouser
//!
//! Implements the `Notifier` contract on top of the platform notification
//! service. Delivery is best-effort: the scheduler logs failures and never
//! retries, so nothing here blocks a tick for long.

use notify_rust::Notification;
use rouser_api::{NotificationRequest, Notifier, NotifyError, NotifyResult};
use tracing::{debug, info};

/// Application name shown by the notification service
const APP_NAME: &str = "rouser";

/// Notifier backed by the desktop notification service
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for DesktopNotifier {
    fn deliver(&self, request: &NotificationRequest) -> NotifyResult<()> {
        let mut notification = Notification::new();
        notification
            .summary(&request.title)
            .body(&request.message)
            .appname(APP_NAME)
            .icon("appointment-soon");

        if let Some(label) = &request.action_label {
            // The action identifier is consumed by whoever listens on the
            // notification bus; the daemon itself does not wait for clicks.
            notification.action("launch", label);
        }

        notification
            .show()
            .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))?;

        debug!(title = %request.title, "Notification shown");
        Ok(())
    }
}

/// Notifier that only logs, for headless environments and development.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for LogNotifier {
    fn deliver(&self, request: &NotificationRequest) -> NotifyResult<()> {
        info!(
            title = %request.title,
            message = %request.message,
            item_id = ?request.item_id,
            "Notification"
        );
        Ok(())
    }
}
