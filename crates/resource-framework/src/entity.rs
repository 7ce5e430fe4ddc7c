//! # AdminResource Trait
//!
//! The `AdminResource` trait defines the contract every manageable resource (airport, FAQ,
//! holiday, …) implements so the generic store and controllers can work with it. The
//! framework never looks inside a record: field shapes live in the associated `Payload`
//! type, and the trait only exposes what the plumbing needs (identity, endpoint path,
//! form pre-population and the local pre-flight checks).
//!
//! # Architecture Note
//! By defining a contract that all resource types must satisfy, we write the store actor,
//! the dialog controller and the delete controller *once* and reuse them for every screen.
//! A `Holiday` store only accepts a `HolidayPayload`; the compiler rejects an
//! `AirportPayload` sent to it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Describes the file a resource carries, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileField {
    /// Multipart field name the server expects the file under.
    pub name: &'static str,
    /// Whether a create must include a staged file.
    pub required_on_create: bool,
}

impl FileField {
    /// A file that must be supplied when the record is created.
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required_on_create: true,
        }
    }

    /// A file that may be omitted.
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required_on_create: false,
        }
    }
}

/// Trait that any resource must implement to be managed by a `StoreActor`.
///
/// # Associated Types
/// - `Id`: the server-assigned identifier, stable across the record's lifetime.
/// - `Payload`: the form data sent on create/update. `Default` is the empty form.
///
/// # Provided Methods
/// [`AdminResource::validate`] defaults to accepting everything. Override it to reject
/// obviously incomplete forms before they reach the server.
pub trait AdminResource: Clone + Debug + DeserializeOwned + Send + Sync + 'static {
    /// The unique identifier for this resource (e.g., a numeric or string newtype).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + Serialize + DeserializeOwned;

    /// The create/update payload (DTO).
    type Payload: Clone + Debug + Default + Serialize + Send + Sync + 'static;

    /// Collection path segment, e.g. `"airports"` for `/airports`.
    const COLLECTION: &'static str;

    /// Human-readable singular name used in notifications, e.g. `"Airport"`.
    const LABEL: &'static str;

    /// The file this resource carries, if any.
    const FILE: Option<FileField> = None;

    /// The persisted record's identifier.
    fn id(&self) -> &Self::Id;

    /// Builds the edit form from a persisted record.
    fn to_payload(&self) -> Self::Payload;

    /// Local pre-flight check run before a submit reaches the server.
    ///
    /// Returns a human-readable message describing the first problem found.
    fn validate(_payload: &Self::Payload) -> Result<(), String> {
        Ok(())
    }
}
