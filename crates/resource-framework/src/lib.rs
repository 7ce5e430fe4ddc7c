//! # Resource Framework
//!
//! Building blocks for admin screens that list, create, edit and delete server-side
//! records: a cached store per resource type, a create/edit dialog controller, a
//! confirm-then-delete controller, and the pieces they share (notification slot,
//! double-submit guard, upload validation and staging).
//!
//! ## Why an Actor per Collection?
//!
//! Every screen needs the same thing from its collection: a consistent local copy that is
//! only ever replaced by what the server says. A [`StoreActor`] owns that copy and handles
//! requests one at a time, so:
//!
//! - The collection has exactly one writer and needs no lock
//! - Every successful mutation is followed by a full refresh (no local patching)
//! - A failed refresh keeps the previous collection (stale but consistent)
//!
//! Controllers talk to it through a cloneable [`StoreClient`] and only ever see copies.
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Resource Layer** ([`AdminResource`]) - Record shape, payload, endpoint, local checks
//! 2. **Store Layer** ([`StoreActor`], [`StoreClient`], [`ResourceTransport`]) - Cache and REST calls
//! 3. **Session Layer** ([`ResourceDialogController`], [`DeleteConfirmationController`]) - UI state machines
//! 4. **Factory** ([`ResourceManager`]) - Wires the layers per resource type
//!
//! ## Defining a Resource
//!
//! ```rust,ignore
//! use resource_framework::{AdminResource, FileField};
//!
//! #[derive(Clone, Debug, Deserialize)]
//! struct Holiday { id: u64, title: String, image: Option<String> }
//!
//! #[derive(Clone, Debug, Default, Serialize)]
//! struct HolidayPayload { title: String }
//!
//! impl AdminResource for Holiday {
//!     type Id = u64;
//!     type Payload = HolidayPayload;
//!     const COLLECTION: &'static str = "holidays";
//!     const LABEL: &'static str = "Holiday";
//!     const FILE: Option<FileField> = Some(FileField::required("image"));
//!
//!     fn id(&self) -> &u64 { &self.id }
//!     fn to_payload(&self) -> HolidayPayload { HolidayPayload { title: self.title.clone() } }
//!     fn validate(form: &HolidayPayload) -> Result<(), String> {
//!         if form.title.trim().is_empty() { return Err("Title is required".into()); }
//!         Ok(())
//!     }
//! }
//! ```
//!
//! ## Running a Screen
//!
//! ```rust,ignore
//! let transport = HttpTransport::new("https://api.example.com", Some(token), connect, request)?;
//! let (holidays, _handle) = ResourceManager::<Holiday>::builder()
//!     .uploads(stager, UploadPolicy::images())
//!     .spawn(transport);
//!
//! let dialog = holidays.dialog();
//! dialog.open(None);
//! dialog.attach_file(UploadCandidate::new("beach.png", "image/png", bytes)).await?;
//! match dialog.submit(HolidayPayload { title: "Maldives".into() }).await {
//!     SubmitOutcome::Committed(holiday) => { /* dialog closed, success posted */ }
//!     SubmitOutcome::Rejected(error) => { /* dialog still open, error posted */ }
//!     SubmitOutcome::Ignored | SubmitOutcome::Detached => {}
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each store runs in its own Tokio task and processes requests **sequentially**
//! - Controllers are `&self` APIs meant to be shared (`Arc`) between UI event handlers
//! - Controller state sits behind a mutex that is never held across an `.await`
//! - Only network calls and the staging disk write suspend
//!
//! ## Testing
//!
//! [`mock::MockStore`] answers a real [`StoreClient`] from scripted expectations, so
//! controllers can be driven through any outcome without a server. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod delete;
pub mod dialog;
pub mod entity;
pub mod error;
pub mod guard;
pub mod manager;
pub mod message;
pub mod mock;
pub mod notification;
pub mod staging;
pub mod tracing;
pub mod transport;
pub mod upload;

// Re-export core types for convenience
pub use actor::StoreActor;
pub use client::StoreClient;
pub use delete::{DeleteConfirmationController, DeleteOutcome, DeleteState};
pub use dialog::{DialogState, ResourceDialogController, SubmitOutcome};
pub use entity::{AdminResource, FileField};
pub use error::{SessionError, StoreError, UploadError, GENERIC_ERROR_MESSAGE};
pub use guard::{ActionKey, GuardPermit, SubmissionGuard};
pub use manager::{ResourceManager, ResourceManagerBuilder};
pub use message::{Response, StoreRequest};
pub use notification::{Notification, NotificationChannel, Severity, TtlOverrides};
pub use staging::{StagedFile, UploadStager};
pub use transport::{HttpTransport, ResourceTransport};
pub use upload::{PendingUpload, UploadCandidate, UploadPolicy};
