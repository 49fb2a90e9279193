//! User-facing notifications.
//!
//! Controllers report every outcome the user should see through a
//! [`Notifier`]. Presentation (toasts, console lines) is up to the
//! implementation.

use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use crate::error::ClientError;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A single user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Error notification describing `err`.
    #[must_use]
    pub fn from_error(err: &ClientError) -> Self {
        Self::error(err.title(), err.user_message())
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, NotificationKind::Error)
    }
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                info!(title = %notification.title, message = %notification.message, "Notification");
            }
            NotificationKind::Error => {
                warn!(title = %notification.title, message = %notification.message, "Notification");
            }
        }
    }
}

/// Notifier that queues notifications until the presentation layer drains
/// them.
#[derive(Debug, Default)]
pub struct QueuedNotifier {
    queue: Mutex<Vec<Notification>>,
}

impl QueuedNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Copy of the queue without draining it.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for QueuedNotifier {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification.clone());
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
