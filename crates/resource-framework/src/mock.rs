//! # Mock Store & Testing Guide
//!
//! [`MockStore<R>`] hands out a real [`StoreClient<R>`] whose requests are answered from a
//! queue of expectations instead of a server. Controllers cannot tell the difference, which
//! makes it the quickest way to drive a dialog or delete session into a specific outcome.
//!
//! ## When to use Mocks vs a Real Store
//!
//! | Feature | MockStore | StoreActor + fake transport | StoreActor + HttpTransport |
//! |---------|-----------|-----------------------------|----------------------------|
//! | **Speed** | Instant | Instant | Local HTTP round trips |
//! | **State** | None (scripted) | Real cache + reconcile | Real cache + wire format |
//! | **Use Case** | Controller logic | Store semantics | Status mapping, multipart |
//! | **Error Injection** | `return_err` | Custom transport | Mock server responses |
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut mock = MockStore::<Airport>::new();
//! mock.expect_create().return_err(StoreError::ValidationFailed("Code taken".into()));
//!
//! let dialog = ResourceDialogController::new(mock.client(), NotificationChannel::default());
//! dialog.open(None);
//! let outcome = dialog.submit(form).await;
//!
//! assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
//! mock.verify();
//! ```
//!
//! A request with no matching expectation panics the mock's task; the caller then sees
//! [`StoreError::StoreDropped`].
//!
//! ## Mocking Utilities
//!
//! Use [`create_mock_store`] to get a client and a receiver and answer each request by hand,
//! or use the fluent [`MockStore`] API.

use crate::client::StoreClient;
use crate::entity::AdminResource;
use crate::error::StoreError;
use crate::message::{Response, StoreRequest};
use crate::staging::StagedFile;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation<R: AdminResource> {
    Refresh {
        response: Result<Vec<R>, StoreError>,
    },
    Create {
        response: Result<R, StoreError>,
    },
    Update {
        response: Result<R, StoreError>,
    },
    Delete {
        response: Result<(), StoreError>,
    },
}

/// A request the mock received, in arrival order.
#[derive(Debug, Clone)]
pub enum MockCall<R: AdminResource> {
    Refresh,
    Snapshot,
    Create {
        payload: R::Payload,
        file: Option<StagedFile>,
    },
    Update {
        id: R::Id,
        payload: R::Payload,
        file: Option<StagedFile>,
    },
    Delete {
        id: R::Id,
    },
}

type Shared<T> = Arc<Mutex<T>>;

fn lock<T>(shared: &Shared<T>) -> MutexGuard<'_, T> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A scripted store with expectation tracking.
///
/// `Snapshot` requests never consume an expectation; they return the last successful
/// refresh response.
pub struct MockStore<R: AdminResource> {
    client: StoreClient<R>,
    expectations: Shared<VecDeque<Expectation<R>>>,
    calls: Shared<Vec<MockCall<R>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<R: AdminResource> Default for MockStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AdminResource> MockStore<R> {
    /// Creates a new mock store with no expectations. Must be called inside a runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<R>>(100);
        let expectations: Shared<VecDeque<Expectation<R>>> = Arc::default();
        let calls: Shared<Vec<MockCall<R>>> = Arc::default();
        let task_expectations = expectations.clone();
        let task_calls = calls.clone();

        let handle = tokio::spawn(async move {
            let mut cached: Vec<R> = Vec::new();
            while let Some(request) = receiver.recv().await {
                if let StoreRequest::Snapshot { respond_to } = request {
                    lock(&task_calls).push(MockCall::Snapshot);
                    let _ = respond_to.send(Ok(cached.clone()));
                    continue;
                }

                let expectation = lock(&task_expectations).pop_front();
                match (request, expectation) {
                    (StoreRequest::Refresh { respond_to }, Some(Expectation::Refresh { response })) => {
                        lock(&task_calls).push(MockCall::Refresh);
                        if let Ok(records) = &response {
                            cached = records.clone();
                        }
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Create {
                            payload,
                            file,
                            respond_to,
                        },
                        Some(Expectation::Create { response }),
                    ) => {
                        lock(&task_calls).push(MockCall::Create { payload, file });
                        let _ = respond_to.send(response);
                    }
                    (
                        StoreRequest::Update {
                            id,
                            payload,
                            file,
                            respond_to,
                        },
                        Some(Expectation::Update { response }),
                    ) => {
                        lock(&task_calls).push(MockCall::Update { id, payload, file });
                        let _ = respond_to.send(response);
                    }
                    (StoreRequest::Delete { id, respond_to }, Some(Expectation::Delete { response })) => {
                        lock(&task_calls).push(MockCall::Delete { id });
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {request:?}");
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            calls,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> StoreClient<R> {
        self.client.clone()
    }

    /// Expects a `list` (refresh) request.
    pub fn expect_refresh(&mut self) -> ExpectationBuilder<R, Vec<R>> {
        self.builder(|response| Expectation::Refresh { response })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<R, R> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_update(&mut self) -> ExpectationBuilder<R, R> {
        self.builder(|response| Expectation::Update { response })
    }

    pub fn expect_delete(&mut self) -> ExpectationBuilder<R, ()> {
        self.builder(|response| Expectation::Delete { response })
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<MockCall<R>> {
        lock(&self.calls).clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    fn builder<T>(
        &self,
        wrap: fn(Result<T, StoreError>) -> Expectation<R>,
    ) -> ExpectationBuilder<R, T> {
        ExpectationBuilder {
            wrap,
            expectations: self.expectations.clone(),
        }
    }
}

/// Sets the response for one expected request.
pub struct ExpectationBuilder<R: AdminResource, T> {
    wrap: fn(Result<T, StoreError>) -> Expectation<R>,
    expectations: Shared<VecDeque<Expectation<R>>>,
}

impl<R: AdminResource, T> ExpectationBuilder<R, T> {
    pub fn return_ok(self, value: T) {
        lock(&self.expectations).push_back((self.wrap)(Ok(value)));
    }

    pub fn return_err(self, error: StoreError) {
        lock(&self.expectations).push_back((self.wrap)(Err(error)));
    }
}

// =============================================================================
// MANUAL HELPERS
// =============================================================================

/// Creates a client and the receiving end of its channel.
///
/// Useful when a test needs to hold a response back, e.g. to close a dialog while its
/// submit is still in flight.
pub fn create_mock_store<R: AdminResource>(
    buffer_size: usize,
) -> (StoreClient<R>, mpsc::Receiver<StoreRequest<R>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<R: AdminResource>(
    receiver: &mut mpsc::Receiver<StoreRequest<R>>,
) -> Option<(R::Payload, Option<StagedFile>, Response<R>)> {
    match receiver.recv().await {
        Some(StoreRequest::Create {
            payload,
            file,
            respond_to,
        }) => Some((payload, file, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<R: AdminResource>(
    receiver: &mut mpsc::Receiver<StoreRequest<R>>,
) -> Option<(R::Id, R::Payload, Option<StagedFile>, Response<R>)> {
    match receiver.recv().await {
        Some(StoreRequest::Update {
            id,
            payload,
            file,
            respond_to,
        }) => Some((id, payload, file, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<R: AdminResource>(
    receiver: &mut mpsc::Receiver<StoreRequest<R>>,
) -> Option<(R::Id, Response<()>)> {
    match receiver.recv().await {
        Some(StoreRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}
