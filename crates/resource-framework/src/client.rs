//! # Store Client
//!
//! The cloneable handle controllers use to talk to a `StoreActor`.

use crate::entity::AdminResource;
use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::staging::StagedFile;
use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

/// Type-safe async API over a `StoreActor<R>`.
///
/// Holds only a channel sender, so cloning is cheap and clones can be shared across tasks.
/// Every method returns a copy of the data; the authoritative collection stays in the actor.
pub struct StoreClient<R: AdminResource> {
    sender: mpsc::Sender<StoreRequest<R>>,
}

impl<R: AdminResource> Clone for StoreClient<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<R: AdminResource> StoreClient<R> {
    pub fn new(sender: mpsc::Sender<StoreRequest<R>>) -> Self {
        Self { sender }
    }

    /// Fetch-and-replace. On [`StoreError::FetchFailed`] the cached collection is unchanged.
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn list(&self) -> Result<Vec<R>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Refresh { respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// The cached collection, without contacting the server.
    pub async fn snapshot(&self) -> Result<Vec<R>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Snapshot { respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    #[instrument(skip(self, payload, file), fields(collection = R::COLLECTION))]
    pub async fn create(
        &self,
        payload: R::Payload,
        file: Option<StagedFile>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Create {
                payload,
                file,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    #[instrument(skip(self, payload, file), fields(collection = R::COLLECTION))]
    pub async fn update(
        &self,
        id: R::Id,
        payload: R::Payload,
        file: Option<StagedFile>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Update {
                id,
                payload,
                file,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    pub async fn delete(&self, id: R::Id) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Delete { id, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }
}
