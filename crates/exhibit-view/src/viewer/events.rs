use serde::Serialize;

use super::view::ViewMode;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SecondaryPage {
    pub visible: bool,
    pub content_id: String,
    pub is_first_open: bool,
}

/// Outbound messages for the host UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum Notification {
    ViewChanged(ViewMode),
    SecondaryPageRequested(SecondaryPage),
}

#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, notification: Notification) {
        self.pending.push(notification);
    }

    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }
}
