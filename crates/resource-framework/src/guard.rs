//! # Submission Guard
//!
//! A mutual-exclusion gate per logical action. Each controller owns its own guard, so two
//! dialogs never block each other, but the same dialog can never run two submits at once.
//!
//! Two release policies share one key-space:
//!
//! - **Immediate release** ([`SubmissionGuard::enter`]): the key stays busy until the returned
//!   [`GuardPermit`] is dropped. Used around the async submit and delete calls.
//! - **Cooldown** ([`SubmissionGuard::try_enter_with_cooldown`]): the key is released a fixed
//!   delay after *entry*, whatever the protected work does. Used to swallow double clicks
//!   on buttons that open dialogs or fire a submit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Default cooldown between two accepted activations of the same button.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

/// Name of a guarded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKey(&'static str);

impl ActionKey {
    pub const DIALOG_OPEN: ActionKey = ActionKey("dialog-open");
    pub const SUBMIT: ActionKey = ActionKey("submit");
    pub const SUBMIT_CLICK: ActionKey = ActionKey("submit-click");
    pub const DELETE_OPEN: ActionKey = ActionKey("delete-open");
    pub const DELETE: ActionKey = ActionKey("delete");

    /// A custom key for actions beyond the built-in ones.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
enum Hold {
    /// Held until `leave` is called.
    Open,
    /// Held until the deadline passes.
    Until(Instant),
}

impl Hold {
    fn is_active(&self, now: Instant) -> bool {
        match self {
            Hold::Open => true,
            Hold::Until(deadline) => now < *deadline,
        }
    }
}

/// Per-controller gate preventing re-entry into an action that is still settling.
#[derive(Debug, Clone)]
pub struct SubmissionGuard {
    holds: Arc<Mutex<HashMap<ActionKey, Hold>>>,
    cooldown: Duration,
}

impl Default for SubmissionGuard {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl SubmissionGuard {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            holds: Arc::new(Mutex::new(HashMap::new())),
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Marks `key` busy if it is idle. Returns `false`, changing nothing, if it is busy.
    pub fn try_enter(&self, key: ActionKey) -> bool {
        self.acquire(key, Hold::Open)
    }

    /// Clears `key` regardless of how the protected action ended.
    pub fn leave(&self, key: ActionKey) {
        let mut holds = self.holds.lock().unwrap_or_else(PoisonError::into_inner);
        holds.remove(&key);
        trace!(key = key.name(), "Guard released");
    }

    pub fn is_busy(&self, key: ActionKey) -> bool {
        let holds = self.holds.lock().unwrap_or_else(PoisonError::into_inner);
        holds
            .get(&key)
            .is_some_and(|hold| hold.is_active(Instant::now()))
    }

    /// Immediate-release entry: `key` stays busy until the permit is dropped.
    pub fn enter(&self, key: ActionKey) -> Option<GuardPermit> {
        self.try_enter(key).then(|| GuardPermit {
            guard: self.clone(),
            key,
        })
    }

    /// Cooldown entry: succeeds like [`try_enter`](Self::try_enter), but the release fires
    /// `cooldown` after this call instead of when the work completes.
    pub fn try_enter_with_cooldown(&self, key: ActionKey) -> bool {
        self.acquire(key, Hold::Until(Instant::now() + self.cooldown))
    }

    fn acquire(&self, key: ActionKey, hold: Hold) -> bool {
        let now = Instant::now();
        let mut holds = self.holds.lock().unwrap_or_else(PoisonError::into_inner);
        if holds.get(&key).is_some_and(|current| current.is_active(now)) {
            trace!(key = key.name(), "Guard busy, dropping re-entry");
            return false;
        }
        holds.insert(key, hold);
        true
    }
}

/// Releases its key when dropped.
#[derive(Debug)]
#[must_use = "the guarded region ends when the permit is dropped"]
pub struct GuardPermit {
    guard: SubmissionGuard,
    key: ActionKey,
}

impl Drop for GuardPermit {
    fn drop(&mut self) {
        self.guard.leave(self.key);
    }
}
