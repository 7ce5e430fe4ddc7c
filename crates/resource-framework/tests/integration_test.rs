use async_trait::async_trait;
use resource_framework::{
    AdminResource, DeleteOutcome, DeleteState, DialogState, ResourceManager, ResourceTransport,
    SessionError, Severity, StagedFile, StoreActor, StoreError, SubmitOutcome,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Test Resource ---

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct Airport {
    id: u64,
    code: String,
    name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
struct AirportPayload {
    code: String,
    name: String,
}

impl AdminResource for Airport {
    type Id = u64;
    type Payload = AirportPayload;
    const COLLECTION: &'static str = "airports";
    const LABEL: &'static str = "Airport";

    fn id(&self) -> &u64 {
        &self.id
    }

    fn to_payload(&self) -> AirportPayload {
        AirportPayload {
            code: self.code.clone(),
            name: self.name.clone(),
        }
    }

    fn validate(form: &AirportPayload) -> Result<(), String> {
        if form.name.trim().is_empty() {
            return Err("Airport name is required".to_string());
        }
        Ok(())
    }
}

// --- In-memory server ---

#[derive(Default)]
struct ServerState {
    records: Vec<Airport>,
    next_id: u64,
    fail_fetch: bool,
    fail_writes: bool,
    writes: usize,
}

#[derive(Clone, Default)]
struct FakeTransport {
    state: Arc<Mutex<ServerState>>,
}

impl FakeTransport {
    fn with_records(records: Vec<Airport>) -> Self {
        let next_id = records.iter().map(|a| a.id).max().unwrap_or(0);
        let transport = Self::default();
        {
            let mut state = transport.state.lock().unwrap();
            state.records = records;
            state.next_id = next_id;
        }
        transport
    }

    fn set_fail_fetch(&self, fail: bool) {
        self.state.lock().unwrap().fail_fetch = fail;
    }

    fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }
}

#[async_trait]
impl ResourceTransport<Airport> for FakeTransport {
    async fn fetch_all(&self) -> Result<Vec<Airport>, StoreError> {
        let state = self.state.lock().unwrap();
        if state.fail_fetch {
            return Err(StoreError::TransportFailed(None));
        }
        Ok(state.records.clone())
    }

    async fn create(
        &self,
        payload: &AirportPayload,
        _file: Option<&StagedFile>,
    ) -> Result<Airport, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        if state.fail_writes {
            return Err(StoreError::TransportFailed(Some(
                "Service unavailable".to_string(),
            )));
        }
        if state.records.iter().any(|a| a.code == payload.code) {
            return Err(StoreError::ValidationFailed(
                "Airport code already exists".to_string(),
            ));
        }
        state.next_id += 1;
        let airport = Airport {
            id: state.next_id,
            code: payload.code.clone(),
            name: payload.name.clone(),
        };
        state.records.push(airport.clone());
        Ok(airport)
    }

    async fn update(
        &self,
        id: &u64,
        payload: &AirportPayload,
        _file: Option<&StagedFile>,
    ) -> Result<Airport, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        if state.fail_writes {
            return Err(StoreError::TransportFailed(Some(
                "Service unavailable".to_string(),
            )));
        }
        let airport = state
            .records
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        airport.code = payload.code.clone();
        airport.name = payload.name.clone();
        Ok(airport.clone())
    }

    async fn delete(&self, id: &u64) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        if state.fail_writes {
            return Err(StoreError::TransportFailed(Some(
                "Service unavailable".to_string(),
            )));
        }
        let before = state.records.len();
        state.records.retain(|a| a.id != *id);
        if state.records.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn airport(id: u64, code: &str, name: &str) -> Airport {
    Airport {
        id,
        code: code.to_string(),
        name: name.to_string(),
    }
}

fn payload(code: &str, name: &str) -> AirportPayload {
    AirportPayload {
        code: code.to_string(),
        name: name.to_string(),
    }
}

// --- Store ---

#[tokio::test]
async fn test_create_then_list_contains_the_record() {
    let (actor, client) = StoreActor::<Airport>::new(10);
    tokio::spawn(actor.run(FakeTransport::default()));

    let created = client.create(payload("LHR", "Heathrow"), None).await.unwrap();
    let listed = client.list().await.unwrap();

    let matching: Vec<_> = listed.iter().filter(|a| a.code == "LHR").collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].name, "Heathrow");
    assert_eq!(matching[0].id, created.id);
}

#[tokio::test]
async fn test_mutation_refreshes_cached_collection() {
    let (actor, client) = StoreActor::<Airport>::new(10);
    tokio::spawn(actor.run(FakeTransport::default()));

    assert!(client.snapshot().await.unwrap().is_empty());
    client.create(payload("MAN", "Manchester"), None).await.unwrap();

    // No explicit list() call; the actor reconciled after the create.
    let cached = client.snapshot().await.unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].code, "MAN");
}

#[tokio::test]
async fn test_second_delete_is_not_found_and_leaves_collection() {
    let transport = FakeTransport::with_records(vec![
        airport(1, "LGW", "Gatwick"),
        airport(2, "STN", "Stansted"),
    ]);
    let (actor, client) = StoreActor::<Airport>::new(10);
    tokio::spawn(actor.run(transport));

    client.list().await.unwrap();
    client.delete(1).await.unwrap();
    let after_first = client.snapshot().await.unwrap();
    assert_eq!(after_first, vec![airport(2, "STN", "Stansted")]);

    let second = client.delete(1).await;
    assert_eq!(second, Err(StoreError::NotFound("1".to_string())));
    assert_eq!(client.snapshot().await.unwrap(), after_first);
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_collection() {
    let transport = FakeTransport::with_records(vec![airport(1, "EDI", "Edinburgh")]);
    let (actor, client) = StoreActor::<Airport>::new(10);
    tokio::spawn(actor.run(transport.clone()));

    let first = client.list().await.unwrap();
    transport.set_fail_fetch(true);

    let result = client.list().await;
    assert!(matches!(result, Err(StoreError::FetchFailed(_))));
    assert_eq!(client.snapshot().await.unwrap(), first);
}

#[tokio::test]
async fn test_update_of_missing_record_is_not_found() {
    let (actor, client) = StoreActor::<Airport>::new(10);
    tokio::spawn(actor.run(FakeTransport::default()));

    let result = client.update(42, payload("BHX", "Birmingham"), None).await;
    assert_eq!(result, Err(StoreError::NotFound("42".to_string())));
}

#[tokio::test]
async fn test_concurrent_clients_are_serialized() {
    let (actor, client) = StoreActor::<Airport>::new(10);
    tokio::spawn(actor.run(FakeTransport::default()));

    let mut handles = vec![];
    for i in 0..10 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .create(payload(&format!("A{i:02}"), &format!("Airport {i}")), None)
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let listed = client.list().await.unwrap();
    assert_eq!(listed.len(), 10);
    let mut ids: Vec<u64> = listed.iter().map(|a| a.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}

// --- Dialog ---

fn manager(transport: FakeTransport) -> ResourceManager<Airport> {
    ResourceManager::<Airport>::builder()
        .cooldown(Duration::ZERO)
        .spawn(transport)
        .0
}

#[tokio::test(start_paused = true)]
async fn test_double_submit_posts_one_validation_error_and_no_request() {
    let transport = FakeTransport::default();
    let (airports, _handle) = ResourceManager::<Airport>::builder().spawn(transport.clone());
    let dialog = airports.dialog();
    assert!(dialog.open(None));

    let first = dialog.submit(AirportPayload::default()).await;
    tokio::time::advance(Duration::from_millis(10)).await;
    let second = dialog.submit(AirportPayload::default()).await;

    assert_eq!(
        first,
        SubmitOutcome::Rejected(SessionError::ValidationFailed(
            "Airport name is required".to_string()
        ))
    );
    assert_eq!(second, SubmitOutcome::Ignored);

    let notification = airports.notifications().current().unwrap();
    assert_eq!(notification.id, 1, "only one notification was posted");
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.message, "Airport name is required");
    assert_eq!(transport.writes(), 0);
    assert_eq!(dialog.state(), DialogState::OpenForCreate);
}

#[tokio::test]
async fn test_successful_create_closes_dialog_and_refreshes() {
    let airports = manager(FakeTransport::default());
    let dialog = airports.dialog();
    dialog.open(None);

    let created = match dialog.submit(payload("GLA", "Glasgow")).await {
        SubmitOutcome::Committed(created) => created,
        other => panic!("expected commit, got {other:?}"),
    };
    assert_eq!(created.code, "GLA");
    assert_eq!(dialog.state(), DialogState::Closed);
    assert_eq!(dialog.form(), AirportPayload::default());

    let notification = airports.notifications().current().unwrap();
    assert_eq!(notification.message, "Airport added successfully");
    assert_eq!(notification.severity, Severity::Success);

    assert_eq!(airports.store().snapshot().await.unwrap(), vec![created]);
}

#[tokio::test]
async fn test_server_rejection_keeps_dialog_open_with_message() {
    let airports = manager(FakeTransport::with_records(vec![airport(1, "LHR", "Heathrow")]));
    let dialog = airports.dialog();
    dialog.open(None);

    let outcome = dialog.submit(payload("LHR", "Heathrow again")).await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Rejected(SessionError::Store(StoreError::ValidationFailed(_)))
    ));
    assert_eq!(dialog.state(), DialogState::OpenForCreate);
    assert_eq!(dialog.form(), payload("LHR", "Heathrow again"));
    assert_eq!(
        airports.notifications().current().unwrap().message,
        "Airport code already exists"
    );

    // Corrected and retried.
    let retry = dialog.submit(payload("LCY", "London City")).await;
    assert!(matches!(retry, SubmitOutcome::Committed(_)));
}

#[tokio::test]
async fn test_edit_prepopulates_and_updates() {
    let airports = manager(FakeTransport::with_records(vec![airport(3, "BRS", "Bristol")]));
    let existing = airports.store().list().await.unwrap().remove(0);

    let dialog = airports.dialog();
    assert!(dialog.open(Some(existing.clone())));
    assert_eq!(dialog.state(), DialogState::OpenForEdit(existing));
    assert_eq!(dialog.form(), payload("BRS", "Bristol"));

    let outcome = dialog.submit(payload("BRS", "Bristol Airport")).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Committed(airport(3, "BRS", "Bristol Airport"))
    );
    assert_eq!(
        airports.notifications().current().unwrap().message,
        "Airport updated successfully"
    );
}

#[tokio::test]
async fn test_update_of_vanished_record_is_an_error() {
    let transport = FakeTransport::with_records(vec![airport(3, "BRS", "Bristol")]);
    let airports = manager(transport.clone());
    let dialog = airports.dialog();
    dialog.open(Some(airport(9, "XXX", "Gone")));

    let outcome = dialog.submit(payload("XXX", "Gone")).await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Rejected(SessionError::Store(StoreError::NotFound(_)))
    ));
    assert_eq!(dialog.state(), DialogState::OpenForEdit(airport(9, "XXX", "Gone")));
    assert_eq!(
        airports.notifications().current().unwrap().severity,
        Severity::Error
    );
}

#[tokio::test(start_paused = true)]
async fn test_rapid_reopen_is_suppressed() {
    let (airports, _handle) =
        ResourceManager::<Airport>::builder().spawn(FakeTransport::default());
    let dialog = airports.dialog();

    assert!(dialog.open(None));
    dialog.close();
    assert!(!dialog.open(None));

    tokio::time::advance(Duration::from_millis(500)).await;
    assert!(dialog.open(None));
}

#[tokio::test]
async fn test_close_clears_notification_and_form() {
    let airports = manager(FakeTransport::default());
    let dialog = airports.dialog();
    dialog.open(None);
    dialog.submit(AirportPayload::default()).await;
    assert!(airports.notifications().current().is_some());

    dialog.close();
    assert_eq!(dialog.state(), DialogState::Closed);
    assert!(airports.notifications().current().is_none());
    assert_eq!(dialog.submit(payload("ABZ", "Aberdeen")).await, SubmitOutcome::Ignored);
}

// --- Delete ---

#[tokio::test]
async fn test_confirmed_delete_removes_record() {
    let airports = manager(FakeTransport::with_records(vec![airport(1, "NCL", "Newcastle")]));
    let delete = airports.delete_confirmation(None);

    assert!(delete.request_delete(1, "Newcastle"));
    assert_eq!(
        delete.state(),
        DeleteState::Confirming {
            id: 1,
            label: "Newcastle".to_string()
        }
    );

    assert_eq!(delete.confirm().await, DeleteOutcome::Deleted);
    assert_eq!(delete.state(), DeleteState::Idle);
    assert!(airports.store().snapshot().await.unwrap().is_empty());
    assert_eq!(
        airports.notifications().current().unwrap().message,
        "Airport deleted successfully"
    );
}

#[tokio::test]
async fn test_delete_of_missing_record_is_treated_as_done() {
    let airports = manager(FakeTransport::with_records(vec![airport(1, "NCL", "Newcastle")]));
    let delete = airports.delete_confirmation(None);

    delete.request_delete(404, "Ghost");
    assert_eq!(delete.confirm().await, DeleteOutcome::AlreadyGone);
    assert_eq!(delete.state(), DeleteState::Idle);

    let notification = airports.notifications().current().unwrap();
    assert_ne!(notification.severity, Severity::Error);
    // The miss still reconciles with the server.
    assert_eq!(airports.store().snapshot().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancel_forgets_pending_delete() {
    let transport = FakeTransport::with_records(vec![airport(1, "NCL", "Newcastle")]);
    let airports = manager(transport.clone());
    let delete = airports.delete_confirmation(None);

    delete.request_delete(1, "Newcastle");
    delete.cancel();
    assert_eq!(delete.state(), DeleteState::Idle);
    assert_eq!(delete.confirm().await, DeleteOutcome::Ignored);
    assert_eq!(transport.writes(), 0);
}

#[tokio::test]
async fn test_acting_identity_cannot_delete_itself() {
    let transport = FakeTransport::with_records(vec![airport(5, "INV", "Inverness")]);
    let airports = manager(transport.clone());
    let delete = airports.delete_confirmation(Some(5));

    delete.request_delete(5, "Inverness");
    assert_eq!(
        delete.confirm().await,
        DeleteOutcome::Failed(SessionError::SelfDeletion)
    );
    assert_eq!(delete.state(), DeleteState::Idle);
    assert_eq!(transport.writes(), 0);
    assert_eq!(
        airports.notifications().current().unwrap().message,
        "You cannot delete your own account"
    );
}

#[tokio::test]
async fn test_delete_transport_failure_posts_error_and_keeps_record() {
    let transport = FakeTransport::with_records(vec![airport(1, "NCL", "Newcastle")]);
    let airports = manager(transport.clone());
    airports.store().list().await.unwrap();
    transport.set_fail_writes(true);

    let delete = airports.delete_confirmation(None);
    delete.request_delete(1, "Newcastle");
    assert_eq!(
        delete.confirm().await,
        DeleteOutcome::Failed(SessionError::Store(StoreError::TransportFailed(Some(
            "Service unavailable".to_string()
        ))))
    );
    assert_eq!(delete.state(), DeleteState::Idle);

    let notification = airports.notifications().current().unwrap();
    assert_eq!(notification.severity, Severity::Error);
    assert_eq!(notification.message, "Service unavailable");
    assert_eq!(airports.store().snapshot().await.unwrap().len(), 1);
}
