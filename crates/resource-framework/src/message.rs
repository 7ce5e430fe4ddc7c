//! # Store Messages
//!
//! This module defines the request type exchanged between a `StoreClient` and its
//! `StoreActor`.

use crate::entity::AdminResource;
use crate::error::StoreError;
use crate::staging::StagedFile;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Requests a store actor understands.
///
/// `Create`, `Update` and `Delete` are the mutation intents. Each one is immutable once sent
/// and is answered only after the actor has reconciled its collection with the server.
/// `Refresh` fetches and replaces the collection; `Snapshot` returns the cached copy.
#[derive(Debug)]
pub enum StoreRequest<R: AdminResource> {
    Refresh {
        respond_to: Response<Vec<R>>,
    },
    Snapshot {
        respond_to: Response<Vec<R>>,
    },
    Create {
        payload: R::Payload,
        file: Option<StagedFile>,
        respond_to: Response<R>,
    },
    Update {
        id: R::Id,
        payload: R::Payload,
        file: Option<StagedFile>,
        respond_to: Response<R>,
    },
    Delete {
        id: R::Id,
        respond_to: Response<()>,
    },
}
