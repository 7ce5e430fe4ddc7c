//! # Store Actor
//!
//! This module defines the `StoreActor`, the only owner of a resource collection. It runs in
//! its own Tokio task and processes requests sequentially, so the cached collection is never
//! touched by two mutations at once and needs no lock.
//!
//! Reads hand out copies. Writes go to the server first, and every successful write is
//! followed by a full refresh: the cache is replaced wholesale with what the server returns,
//! never patched locally.

use crate::client::StoreClient;
use crate::entity::AdminResource;
use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::transport::ResourceTransport;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that owns the cached collection for one resource type.
///
/// # Usage Pattern
///
/// 1.  **Create**: `StoreActor::new()` returns the actor and a cloneable client.
/// 2.  **Wire**: pass the transport into `actor.run(transport)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// ```rust,ignore
/// let (actor, client) = StoreActor::<Airport>::new(32);
/// tokio::spawn(actor.run(HttpTransport::new(base_url, None, connect, request)?));
/// let airports = client.list().await?;
/// ```
///
/// The loop ends when every client has been dropped.
pub struct StoreActor<R: AdminResource> {
    receiver: mpsc::Receiver<StoreRequest<R>>,
    collection: Vec<R>,
}

impl<R: AdminResource> StoreActor<R> {
    /// Creates a new `StoreActor` and its associated `StoreClient`.
    ///
    /// `buffer_size` is the request channel capacity; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<R>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            collection: Vec::new(),
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the request loop until the channel closes.
    ///
    /// The transport is injected here rather than in `new`, so stores can be created
    /// before the HTTP client is configured.
    pub async fn run<T: ResourceTransport<R>>(mut self, transport: T) {
        let collection = R::COLLECTION;
        info!(collection, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Refresh { respond_to } => {
                    let result = self.refresh(&transport).await.map(|()| self.collection.clone());
                    let _ = respond_to.send(result);
                }
                StoreRequest::Snapshot { respond_to } => {
                    debug!(collection, size = self.collection.len(), "Snapshot");
                    let _ = respond_to.send(Ok(self.collection.clone()));
                }
                StoreRequest::Create {
                    payload,
                    file,
                    respond_to,
                } => {
                    debug!(collection, ?payload, has_file = file.is_some(), "Create");
                    let result = transport.create(&payload, file.as_ref()).await;
                    match &result {
                        Ok(record) => {
                            info!(collection, id = %record.id(), "Created");
                            self.reconcile(&transport).await;
                        }
                        Err(e) => warn!(collection, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Update {
                    id,
                    payload,
                    file,
                    respond_to,
                } => {
                    debug!(collection, %id, ?payload, has_file = file.is_some(), "Update");
                    let result = transport.update(&id, &payload, file.as_ref()).await;
                    match &result {
                        Ok(_) => {
                            info!(collection, %id, "Updated");
                            self.reconcile(&transport).await;
                        }
                        Err(e) => warn!(collection, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(collection, %id, "Delete");
                    let result = transport.delete(&id).await;
                    match &result {
                        Ok(()) => {
                            info!(collection, %id, "Deleted");
                            self.reconcile(&transport).await;
                        }
                        Err(StoreError::NotFound(_)) => warn!(collection, %id, "Not found"),
                        Err(e) => warn!(collection, %id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(collection, size = self.collection.len(), "Shutdown");
    }

    /// Fetches the collection and replaces the cache. On failure the cache is left as it was.
    async fn refresh<T: ResourceTransport<R>>(&mut self, transport: &T) -> Result<(), StoreError> {
        match transport.fetch_all().await {
            Ok(records) => {
                self.collection = records;
                debug!(collection = R::COLLECTION, size = self.collection.len(), "Refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(collection = R::COLLECTION, error = %e, "Refresh failed, keeping cached collection");
                Err(StoreError::FetchFailed(e.user_message()))
            }
        }
    }

    /// Post-mutation refresh. A failure here does not undo the mutation's result.
    async fn reconcile<T: ResourceTransport<R>>(&mut self, transport: &T) {
        let _ = self.refresh(transport).await;
    }
}
