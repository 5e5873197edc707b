//! Transient user-facing notifications.
//!
//! [`NotificationCenter`] is a queue of short messages that expire on their
//! own. It is an explicit context object: create one and hand clones to
//! whatever needs to post or display notifications.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use uuid::Uuid;

use crate::error::ApiError;

/// Default lifetime of a notification.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        }
    }
}

/// A queued notification
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    /// Zero means the notification stays until removed
    pub duration: Duration,
    pub created_at: DateTime<Utc>,
}

/// Shared queue of notifications in insertion order.
///
/// Cloning shares the queue. Expiry is scheduled on the current tokio
/// runtime; outside a runtime entries stay until removed.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(entries: &Mutex<Vec<Notification>>) -> MutexGuard<'_, Vec<Notification>> {
        // The queue holds plain data; a panic elsewhere cannot leave it half-updated
        entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a notification and return its id.
    ///
    /// With a non-zero `duration` the entry removes itself after that delay,
    /// provided a tokio runtime is running. Without one it is kept until
    /// [`NotificationCenter::remove`] is called.
    pub fn add(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        duration: Duration,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let notification = Notification {
            id,
            message: message.into(),
            kind,
            duration,
            created_at: Utc::now(),
        };

        tracing::debug!("Notification [{}] {}", kind.as_str(), notification.message);
        Self::lock(&self.entries).push(notification);

        if !duration.is_zero() {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let entries = Arc::downgrade(&self.entries);
                    handle.spawn(async move {
                        tokio::time::sleep(duration).await;
                        expire(entries, id);
                    });
                }
                Err(_) => {
                    tracing::warn!("No tokio runtime; notification {} will not expire", id);
                }
            }
        }

        id
    }

    /// Add a notification with the default kind and duration.
    pub fn notify(&self, message: impl Into<String>) -> Uuid {
        self.add(message, NotificationKind::default(), DEFAULT_DURATION)
    }

    /// Add a success notification with the default duration.
    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.add(message, NotificationKind::Success, DEFAULT_DURATION)
    }

    /// Post an error's user-facing message.
    pub fn notify_error(&self, err: &ApiError) -> Uuid {
        self.add(err.user_message(), NotificationKind::Error, DEFAULT_DURATION)
    }

    /// Remove a notification. Returns false if it was already gone.
    pub fn remove(&self, id: Uuid) -> bool {
        remove_from(&self.entries, id)
    }

    /// Snapshot of the current notifications, oldest first.
    pub fn list(&self) -> Vec<Notification> {
        Self::lock(&self.entries).clone()
    }

    pub fn len(&self) -> usize {
        Self::lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn remove_from(entries: &Mutex<Vec<Notification>>, id: Uuid) -> bool {
    let mut entries = NotificationCenter::lock(entries);
    let before = entries.len();
    entries.retain(|n| n.id != id);
    entries.len() != before
}

fn expire(entries: Weak<Mutex<Vec<Notification>>>, id: Uuid) {
    if let Some(entries) = entries.upgrade() {
        if remove_from(&entries, id) {
            tracing::trace!("Notification {} expired", id);
        }
    }
}
