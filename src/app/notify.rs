//! User-facing notifications.
//!
//! The toast counterpart: every action outcome maps to exactly one
//! notification, fanned out over a broadcast channel so any number of
//! front-ends (or none) can render them.

use tokio::sync::broadcast;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// One user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Notification fan-out handle.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.send(Severity::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(Severity::Error, message.into());
    }

    /// Sending with no subscribers is fine; notifications are advisory.
    fn send(&self, severity: Severity, message: String) {
        let _ = self.tx.send(Notification { severity, message });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(64)
    }
}
