//! Notification sink - the seam between the gamification engine and
//! whatever delivers notifications

use std::sync::Mutex;

use crate::models::Notification;

/// Receives level-up and badge-earned notifications. Persistence and
/// delivery are the implementor's concern.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: Notification);
}

/// Default sink: writes notifications to the log
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, notification: Notification) {
        tracing::info!(
            user_id = notification.user_id,
            kind = %notification.kind,
            title = %notification.title,
            message = %notification.message,
            "Notification"
        );
    }
}

/// In-memory sink for tests and the CLI
#[derive(Default)]
pub struct MemorySink {
    inner: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all captured notifications, leaving the sink empty
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut self.inner.lock().expect("sink mutex poisoned"))
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().expect("sink mutex poisoned").is_empty()
    }
}

impl NotificationSink for MemorySink {
    fn deliver(&self, notification: Notification) {
        self.inner
            .lock()
            .expect("sink mutex poisoned")
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationType;

    #[test]
    fn test_memory_sink_captures_and_drains() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.deliver(Notification {
            user_id: 1,
            kind: NotificationType::LevelUp,
            title: "Level Up!".into(),
            message: "You reached level 2".into(),
        });

        let drained = sink.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].kind, NotificationType::LevelUp);
        assert!(sink.is_empty());
    }
}
