//! # Delete Confirmation Controller
//!
//! `Idle → Confirming(id, label) → Deleting → Idle`. A delete of something the server no
//! longer has counts as done.

use crate::client::StoreClient;
use crate::entity::AdminResource;
use crate::error::{SessionError, StoreError};
use crate::guard::{ActionKey, SubmissionGuard};
use crate::notification::{NotificationChannel, Severity, TtlOverrides};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteState<Id> {
    Idle,
    /// Waiting for the user to confirm. `label` is what the prompt names.
    Confirming { id: Id, label: String },
    Deleting { id: Id, label: String },
}

/// What a call to [`DeleteConfirmationController::confirm`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The server had no such record; reported to the user as a successful delete.
    AlreadyGone,
    Failed(SessionError),
    /// Dropped by the guard or because nothing was awaiting confirmation.
    Ignored,
}

/// Confirm-then-delete session for one resource type.
///
/// `acting` is the identity the admin is signed in as, if it can be a delete target
/// (user management). Deleting it is refused locally.
pub struct DeleteConfirmationController<R: AdminResource> {
    store: StoreClient<R>,
    notifications: NotificationChannel,
    guard: SubmissionGuard,
    acting: Option<R::Id>,
    ttl: TtlOverrides,
    state: Mutex<DeleteState<R::Id>>,
}

impl<R: AdminResource> DeleteConfirmationController<R> {
    pub fn new(store: StoreClient<R>, notifications: NotificationChannel) -> Self {
        Self {
            store,
            notifications,
            guard: SubmissionGuard::default(),
            acting: None,
            ttl: TtlOverrides::default(),
            state: Mutex::new(DeleteState::Idle),
        }
    }

    pub fn with_acting_identity(mut self, acting: R::Id) -> Self {
        self.acting = Some(acting);
        self
    }

    pub fn with_guard(mut self, guard: SubmissionGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_notification_ttl(mut self, ttl: TtlOverrides) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn state(&self) -> DeleteState<R::Id> {
        self.lock().clone()
    }

    /// Asks for confirmation to delete `id`. Returns `false` if suppressed or busy.
    pub fn request_delete(&self, id: R::Id, label: impl Into<String>) -> bool {
        if !self.guard.try_enter_with_cooldown(ActionKey::DELETE_OPEN) {
            return false;
        }
        let mut state = self.lock();
        if !matches!(*state, DeleteState::Idle) {
            debug!(collection = R::COLLECTION, "Delete already pending");
            return false;
        }
        let label = label.into();
        debug!(collection = R::COLLECTION, %id, %label, "Confirming delete");
        *state = DeleteState::Confirming { id, label };
        true
    }

    /// Deletes the record awaiting confirmation. Always ends in `Idle`.
    pub async fn confirm(&self) -> DeleteOutcome {
        let Some(_permit) = self.guard.enter(ActionKey::DELETE) else {
            return DeleteOutcome::Ignored;
        };

        let (id, label) = {
            let mut state = self.lock();
            let DeleteState::Confirming { id, label } = state.clone() else {
                return DeleteOutcome::Ignored;
            };
            if self.acting.as_ref() == Some(&id) {
                *state = DeleteState::Idle;
                drop(state);
                return DeleteOutcome::Failed(self.fail(SessionError::SelfDeletion));
            }
            *state = DeleteState::Deleting {
                id: id.clone(),
                label: label.clone(),
            };
            (id, label)
        };

        let outcome = match self.store.delete(id.clone()).await {
            Ok(()) => {
                info!(collection = R::COLLECTION, %id, "Deleted");
                self.post(format!("{} deleted successfully", R::LABEL), Severity::Success);
                DeleteOutcome::Deleted
            }
            Err(StoreError::NotFound(_)) => {
                info!(collection = R::COLLECTION, %id, "Already gone");
                // The actor does not refresh after a miss, so pull the server's view here.
                if let Err(error) = self.store.list().await {
                    warn!(collection = R::COLLECTION, %error, "Refresh after missing delete failed");
                }
                self.post(format!("{} deleted successfully", R::LABEL), Severity::Success);
                DeleteOutcome::AlreadyGone
            }
            Err(e) => {
                warn!(collection = R::COLLECTION, %id, %label, "Delete failed");
                DeleteOutcome::Failed(self.fail(e.into()))
            }
        };

        *self.lock() = DeleteState::Idle;
        outcome
    }

    /// Returns to `Idle`, forgetting the pending id and label.
    pub fn cancel(&self) {
        let mut state = self.lock();
        if let DeleteState::Deleting { .. } = *state {
            // The request is already out; confirm() settles the state.
            return;
        }
        *state = DeleteState::Idle;
    }

    fn fail(&self, error: SessionError) -> SessionError {
        warn!(collection = R::COLLECTION, %error, "Delete error");
        self.post(error.user_message(), Severity::Error);
        error
    }

    fn post(&self, message: String, severity: Severity) {
        self.notifications.post_with(message, severity, &self.ttl);
    }

    fn lock(&self) -> MutexGuard<'_, DeleteState<R::Id>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
