//! Notification delivery contract

use rouser_util::ItemId;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;

/// Errors from notification delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Notification backend unavailable: {0}")]
    BackendUnavailable(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;

/// What clicking the notification's action button should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Launch the item's configured command
    Launch,
}

/// One notification to deliver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,

    /// Item this notification is about, if any
    pub item_id: Option<ItemId>,

    /// Optional action button
    pub action_label: Option<String>,
    pub action_kind: Option<ActionKind>,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            item_id: None,
            action_label: None,
            action_kind: None,
        }
    }

    pub fn for_item(mut self, item_id: ItemId) -> Self {
        self.item_id = Some(item_id);
        self
    }

    pub fn with_action(mut self, label: impl Into<String>, kind: ActionKind) -> Self {
        self.action_label = Some(label.into());
        self.action_kind = Some(kind);
        self
    }
}

/// Notification delivery collaborator.
///
/// Delivery is fire-and-forget from the scheduler's perspective: errors are
/// logged by the caller and never abort a tick.
pub trait Notifier: Send + Sync {
    fn deliver(&self, request: &NotificationRequest) -> NotifyResult<()>;
}

/// Recording notifier for tests: captures every request and can be configured
/// to fail delivery.
#[derive(Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<NotificationRequest>>,
    fail: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn delivered(&self) -> Vec<NotificationRequest> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn delivered_count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.delivered.lock().unwrap().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn deliver(&self, request: &NotificationRequest) -> NotifyResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(NotifyError::DeliveryFailed("recording notifier set to fail".into()));
        }
        self.delivered.lock().unwrap().push(request.clone());
        Ok(())
    }
}
