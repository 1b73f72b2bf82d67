//! Toast notification system
//!
//! Transient user-facing messages produced by mutations. The board and the
//! CLI record toasts into a shared `Notifications` log; the TUI renders the
//! latest one.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

/// A toast notification message
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// The message to display
    pub message: String,
    /// The severity level of the toast
    pub level: ToastLevel,
    /// When the toast was created
    pub timestamp: Instant,
}

/// Severity level for toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl Toast {
    pub fn new(message: String, level: ToastLevel) -> Self {
        Self {
            message,
            level,
            timestamp: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Success)
    }

    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }
}

/// Append-only log of toasts, cheap to clone and share.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    inner: Arc<Mutex<Vec<Toast>>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, toast: Toast) {
        self.inner.lock().push(toast);
    }

    /// Most recent toast
    pub fn latest(&self) -> Option<Toast> {
        self.inner.lock().last().cloned()
    }

    pub fn all(&self) -> Vec<Toast> {
        self.inner.lock().clone()
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.inner.lock())
    }

    pub fn errors(&self) -> Vec<Toast> {
        self.inner
            .lock()
            .iter()
            .filter(|t| t.is_error())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_shared_between_clones() {
        let log = Notifications::new();
        let other = log.clone();
        other.push(Toast::error("Conflict"));
        log.push(Toast::success("Saved"));

        assert_eq!(log.all().len(), 2);
        assert_eq!(log.errors().len(), 1);
        assert_eq!(log.latest().unwrap().message, "Saved");

        let drained = other.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.all().is_empty());
    }
}
