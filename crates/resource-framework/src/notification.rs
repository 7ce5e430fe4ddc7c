//! # Notification Channel
//!
//! Holds at most one live [`Notification`] and clears it when its time-to-live runs out.
//!
//! Posting replaces the current message and restarts the expiry timer. The previous timer
//! is aborted first, and every timer only clears the notification it was started for, so
//! a stale timer can never wipe a message that was posted after it.
//!
//! The channel is backed by a `tokio::sync::watch` so a UI layer can
//! [`subscribe`](NotificationChannel::subscribe) and re-render on change.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default time a notification stays visible.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Per-severity lifetimes a call site wants instead of the channel default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TtlOverrides {
    pub success: Option<Duration>,
    pub error: Option<Duration>,
}

impl TtlOverrides {
    /// The same lifetime for every severity.
    pub fn uniform(ttl: Duration) -> Self {
        Self {
            success: Some(ttl),
            error: Some(ttl),
        }
    }

    pub fn for_severity(&self, severity: Severity) -> Option<Duration> {
        match severity {
            Severity::Success => self.success,
            Severity::Error => self.error,
            Severity::Info => None,
        }
    }
}

/// A single user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Monotonic per channel; identifies which post a timer belongs to.
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

struct Inner {
    sender: watch::Sender<Option<Notification>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    next_id: AtomicU64,
    default_ttl: Duration,
}

/// Single-slot, auto-clearing notification channel. Cheap to clone; clones share the slot.
///
/// Posting spawns the expiry timer on the current Tokio runtime.
#[derive(Clone)]
pub struct NotificationChannel {
    inner: Arc<Inner>,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl std::fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("current", &*self.inner.sender.borrow())
            .field("default_ttl", &self.inner.default_ttl)
            .finish()
    }
}

impl NotificationChannel {
    pub fn new(default_ttl: Duration) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                sender,
                timer: Mutex::new(None),
                next_id: AtomicU64::new(1),
                default_ttl,
            }),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    /// Posts with the channel's default time-to-live. Returns the notification id.
    pub fn post(&self, message: impl Into<String>, severity: Severity) -> u64 {
        self.post_for(message, severity, self.inner.default_ttl)
    }

    /// Posts with an explicit time-to-live, superseding whatever is showing.
    pub fn post_for(&self, message: impl Into<String>, severity: Severity, ttl: Duration) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: Utc::now(),
            ttl,
        };
        debug!(id, ?severity, message = %notification.message, "Notification posted");

        // Lock order: timer slot first, then the watch value, so two posts serialize.
        let mut timer = self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        self.inner.sender.send_replace(Some(notification));
        *timer = Some(tokio::spawn(expire(Arc::downgrade(&self.inner), id, ttl)));
        id
    }

    /// Cancels the timer and empties the channel immediately.
    pub fn clear(&self) {
        let mut timer = self.inner.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        if self.inner.sender.send_replace(None).is_some() {
            debug!("Notification cleared");
        }
    }

    /// Point-in-time copy of the live notification.
    pub fn current(&self) -> Option<Notification> {
        self.inner.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.sender.subscribe()
    }

    /// Posts with the override for `severity` if there is one, else the default.
    pub fn post_with(&self, message: impl Into<String>, severity: Severity, ttl: &TtlOverrides) -> u64 {
        match ttl.for_severity(severity) {
            Some(ttl) => self.post_for(message, severity, ttl),
            None => self.post(message, severity),
        }
    }
}

async fn expire(inner: Weak<Inner>, id: u64, ttl: Duration) {
    tokio::time::sleep(ttl).await;
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let cleared = inner.sender.send_if_modified(|current| {
        if current.as_ref().is_some_and(|n| n.id == id) {
            *current = None;
            true
        } else {
            false
        }
    });
    if cleared {
        debug!(id, "Notification expired");
    }
}
