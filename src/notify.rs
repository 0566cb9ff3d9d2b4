//! Notification sinks for user-facing success and failure messages.

use std::sync::Arc;

use parking_lot::Mutex;

/// Severity of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An operation took effect.
    Success,
    /// An operation did not take effect.
    Error,
}

/// Receives (message, severity) pairs, e.g. to show toasts.
pub trait Notifier: Send + Sync {
    /// Deliver one message.
    fn notify(&self, message: &str, severity: Severity);
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _message: &str, _severity: Severity) {}
}

/// Forwards messages as `tracing` events when the `tracing` feature is
/// enabled; a no-op otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => {
                trace_info!("{message}");
            }
            Severity::Error => {
                trace_warn!("{message}");
            }
        }
        #[cfg(not(feature = "tracing"))]
        let _ = message;
    }
}

/// Keeps every message in memory; useful in tests and headless tools.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<(String, Severity)>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all messages received so far.
    #[must_use]
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().clone()
    }

    /// Returns the most recent message.
    #[must_use]
    pub fn last(&self) -> Option<(String, Severity)> {
        self.messages.lock().last().cloned()
    }

    /// Drops all recorded messages.
    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages.lock().push((message.to_string(), severity));
    }
}
