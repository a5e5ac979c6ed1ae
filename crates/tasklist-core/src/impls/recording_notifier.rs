//! RecordingNotifier - 通知を溜めておくだけの Notifier（テスト用）

use std::sync::Mutex;

use crate::ports::Notifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Progress(String),
    Info(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, notification: Notification) {
        match self.notifications.lock() {
            Ok(mut guard) => guard.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn progress(&self, title: &str) {
        self.push(Notification::Progress(title.to_string()));
    }

    fn info(&self, message: &str) {
        self.push(Notification::Info(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Notification::Error(message.to_string()));
    }
}
