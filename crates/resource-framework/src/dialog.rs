//! # Resource Dialog Controller
//!
//! Drives one "create or edit one item" dialog:
//!
//! ```text
//! Closed ──open()──▶ OpenForCreate | OpenForEdit(record)
//!                          │ submit()
//!                          ▼
//!                      Submitting ──ok──▶ Closed
//!                          │
//!                          └──err──▶ back to the open state it came from
//! ```
//!
//! The controller is shared (`&self` everywhere) so that duplicate UI events can reach it
//! concurrently; its [`SubmissionGuard`] is what turns those duplicates into no-ops. Session
//! state sits behind a mutex that is never held across an `.await`.
//!
//! Every failure ends up as a notification on the shared [`NotificationChannel`]; nothing
//! escapes the controller as a panic.

use crate::client::StoreClient;
use crate::entity::AdminResource;
use crate::error::SessionError;
use crate::guard::{ActionKey, SubmissionGuard};
use crate::notification::{NotificationChannel, Severity, TtlOverrides};
use crate::staging::{StagedFile, UploadStager};
use crate::upload::{self, UploadCandidate, UploadPolicy};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Where a dialog is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogState<R: AdminResource> {
    Closed,
    OpenForCreate,
    OpenForEdit(R),
    /// A submit is in flight. `editing` is the record being edited, if any, so a
    /// failure can return to the right open state.
    Submitting { editing: Option<R> },
}

impl<R: AdminResource> DialogState<R> {
    pub fn is_open(&self) -> bool {
        matches!(self, DialogState::OpenForCreate | DialogState::OpenForEdit(_))
    }
}

/// What a call to [`ResourceDialogController::submit`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R: AdminResource> {
    /// The server accepted the write; the dialog is closed.
    Committed(R),
    /// Rejected locally or by the server; the dialog stays open for a retry.
    Rejected(SessionError),
    /// The dialog was closed while the request was in flight; the response was ignored.
    Detached,
    /// Dropped by the guard or because no dialog was open. Nothing happened.
    Ignored,
}

/// Stager and policies used for file-bearing resources. The declared type picks the policy.
#[derive(Debug, Clone)]
pub struct UploadSlot {
    pub stager: Arc<UploadStager>,
    pub policies: Vec<UploadPolicy>,
}

struct Session<R: AdminResource> {
    state: DialogState<R>,
    form: R::Payload,
    staged: Option<StagedFile>,
    /// Bumped on every open and close so late responses can tell they are stale.
    generation: u64,
}

impl<R: AdminResource> Session<R> {
    fn reset(&mut self) {
        self.state = DialogState::Closed;
        self.form = R::Payload::default();
        self.staged = None;
        self.generation += 1;
    }
}

/// Create/edit session for one resource type.
pub struct ResourceDialogController<R: AdminResource> {
    store: StoreClient<R>,
    notifications: NotificationChannel,
    guard: SubmissionGuard,
    uploads: Option<UploadSlot>,
    ttl: TtlOverrides,
    session: Mutex<Session<R>>,
}

impl<R: AdminResource> ResourceDialogController<R> {
    pub fn new(store: StoreClient<R>, notifications: NotificationChannel) -> Self {
        Self {
            store,
            notifications,
            guard: SubmissionGuard::default(),
            uploads: None,
            ttl: TtlOverrides::default(),
            session: Mutex::new(Session {
                state: DialogState::Closed,
                form: R::Payload::default(),
                staged: None,
                generation: 0,
            }),
        }
    }

    /// Enables file attachments for this dialog.
    pub fn with_uploads(self, stager: Arc<UploadStager>, policy: UploadPolicy) -> Self {
        self.with_upload_policies(stager, vec![policy])
    }

    /// Enables attachments of several kinds, each held to its own policy.
    pub fn with_upload_policies(mut self, stager: Arc<UploadStager>, policies: Vec<UploadPolicy>) -> Self {
        self.uploads = Some(UploadSlot { stager, policies });
        self
    }

    pub fn with_guard(mut self, guard: SubmissionGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Overrides how long this dialog's notifications stay visible.
    pub fn with_notification_ttl(mut self, ttl: TtlOverrides) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn state(&self) -> DialogState<R> {
        self.lock().state.clone()
    }

    /// The current form contents (pre-populated on edit, empty on create).
    pub fn form(&self) -> R::Payload {
        self.lock().form.clone()
    }

    pub fn staged_file(&self) -> Option<StagedFile> {
        self.lock().staged.clone()
    }

    /// Opens the dialog for `record` (edit) or for a new item (create).
    ///
    /// Returns `false` when a rapid repeat is suppressed or a dialog is already open.
    pub fn open(&self, record: Option<R>) -> bool {
        if !self.guard.try_enter_with_cooldown(ActionKey::DIALOG_OPEN) {
            return false;
        }
        let mut session = self.lock();
        if !matches!(session.state, DialogState::Closed) {
            debug!(collection = R::COLLECTION, "Dialog already open");
            return false;
        }
        session.reset();
        match record {
            Some(record) => {
                debug!(collection = R::COLLECTION, id = %record.id(), "Dialog opened for edit");
                session.form = record.to_payload();
                session.state = DialogState::OpenForEdit(record);
            }
            None => {
                debug!(collection = R::COLLECTION, "Dialog opened for create");
                session.state = DialogState::OpenForCreate;
            }
        }
        true
    }

    /// Validates and stages a file for this session, replacing any earlier one.
    ///
    /// A rejected or unstorable file is reported on the notification channel and leaves the
    /// session without a staged file.
    pub async fn attach_file(&self, candidate: UploadCandidate) -> Result<StagedFile, SessionError> {
        let Some(uploads) = self.uploads.clone() else {
            return Err(self.fail(SessionError::ValidationFailed(format!(
                "{} does not accept files",
                R::LABEL
            ))));
        };
        let generation = {
            let session = self.lock();
            if !session.state.is_open() {
                return Err(self.fail(SessionError::ValidationFailed(
                    "Open the form before attaching a file".to_string(),
                )));
            }
            session.generation
        };

        let pending = match upload::validate_any(candidate, &uploads.policies) {
            Ok(pending) => pending,
            Err(e) => {
                self.lock().staged = None;
                return Err(self.fail(e.into()));
            }
        };
        let staged = match uploads.stager.stage(pending).await {
            Ok(staged) => staged,
            Err(e) => {
                self.lock().staged = None;
                return Err(self.fail(e.into()));
            }
        };

        let mut session = self.lock();
        if session.generation != generation {
            // Closed while writing; the file is left for the janitor.
            debug!(collection = R::COLLECTION, "Dialog closed during staging, dropping file");
            return Err(SessionError::Detached);
        }
        session.staged = Some(staged.clone());
        Ok(staged)
    }

    /// Submits `form` as a create or an update depending on how the dialog was opened.
    ///
    /// Rapid repeats and calls made while a submit is in flight are dropped silently and
    /// return [`SubmitOutcome::Ignored`]; the first call's outcome stands.
    pub async fn submit(&self, form: R::Payload) -> SubmitOutcome<R> {
        if !self.guard.try_enter_with_cooldown(ActionKey::SUBMIT_CLICK) {
            return SubmitOutcome::Ignored;
        }
        let Some(_permit) = self.guard.enter(ActionKey::SUBMIT) else {
            return SubmitOutcome::Ignored;
        };

        let (editing, staged, generation) = {
            let mut session = self.lock();
            let editing = match &session.state {
                DialogState::OpenForCreate => None,
                DialogState::OpenForEdit(record) => Some(record.clone()),
                _ => return SubmitOutcome::Ignored,
            };
            session.form = form.clone();

            if let Err(message) = R::validate(&form) {
                drop(session);
                return SubmitOutcome::Rejected(self.fail(SessionError::ValidationFailed(message)));
            }
            if let (None, Some(field)) = (&editing, R::FILE) {
                if field.required_on_create && session.staged.is_none() {
                    drop(session);
                    return SubmitOutcome::Rejected(
                        self.fail(SessionError::MissingRequiredFile(field.name)),
                    );
                }
            }

            session.state = DialogState::Submitting {
                editing: editing.clone(),
            };
            (editing, session.staged.clone(), session.generation)
        };

        let result = match &editing {
            Some(record) => self.store.update(record.id().clone(), form, staged).await,
            None => self.store.create(form, staged).await,
        };

        let mut session = self.lock();
        if session.generation != generation {
            info!(collection = R::COLLECTION, ok = result.is_ok(), "Dialog closed before response, ignoring");
            return SubmitOutcome::Detached;
        }
        match result {
            Ok(record) => {
                session.reset();
                drop(session);
                let verb = if editing.is_some() { "updated" } else { "added" };
                info!(collection = R::COLLECTION, id = %record.id(), verb, "Saved");
                self.post(format!("{} {verb} successfully", R::LABEL), Severity::Success);
                SubmitOutcome::Committed(record)
            }
            Err(e) => {
                session.state = match editing {
                    Some(record) => DialogState::OpenForEdit(record),
                    None => DialogState::OpenForCreate,
                };
                drop(session);
                SubmitOutcome::Rejected(self.fail(e.into()))
            }
        }
    }

    /// Closes the dialog from any state, dropping the form and any staged file.
    ///
    /// Closing during a submit does not cancel the request; its response is ignored.
    pub fn close(&self) {
        let mut session = self.lock();
        if matches!(session.state, DialogState::Closed) {
            return;
        }
        if matches!(session.state, DialogState::Submitting { .. }) {
            debug!(collection = R::COLLECTION, "Detaching from in-flight submit");
        }
        session.reset();
        drop(session);
        self.notifications.clear();
    }

    fn fail(&self, error: SessionError) -> SessionError {
        warn!(collection = R::COLLECTION, %error, "Dialog error");
        self.post(error.user_message(), Severity::Error);
        error
    }

    fn post(&self, message: String, severity: Severity) {
        self.notifications.post_with(message, severity, &self.ttl);
    }

    fn lock(&self) -> MutexGuard<'_, Session<R>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
