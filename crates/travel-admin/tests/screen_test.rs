use resource_framework::mock::{create_mock_store, expect_create, expect_delete, MockCall, MockStore};
use resource_framework::{
    DeleteOutcome, DeleteState, DialogState, ResourceManager, SessionError, SubmitOutcome,
    UploadCandidate, UploadError, UploadPolicy, UploadStager,
};
use std::sync::Arc;
use std::time::Duration;
use travel_admin::model::{
    media_policies, CarouselSlide, CarouselSlideForm, Holiday, HolidayForm, HolidayId, Role, User, UserForm,
};

const MIB: usize = 1024 * 1024;

/// Screens driven against a scripted store.
///
/// Pattern 2: Controller + Mock
/// - Real dialog controller (guards, validation, upload rules)
/// - Mocked store (no actor, no server)

fn algarve_form() -> HolidayForm {
    HolidayForm {
        title: "Algarve Escape".to_string(),
        destination: "Albufeira".to_string(),
        price: 649,
        nights: 7,
        ..HolidayForm::default()
    }
}

fn algarve(id: u64) -> Holiday {
    Holiday {
        id: HolidayId(id),
        title: "Algarve Escape".to_string(),
        destination: "Albufeira".to_string(),
        price: 649,
        nights: 7,
        board_basis_id: None,
        departure_airport_id: None,
        image: "/uploads/holidays/algarve.png".to_string(),
    }
}

#[tokio::test]
async fn test_holiday_create_requires_image() {
    let mock = MockStore::<Holiday>::new();
    let staging = tempfile::tempdir().unwrap();
    let holidays = ResourceManager::<Holiday>::builder()
        .uploads(Arc::new(UploadStager::new(staging.path())), UploadPolicy::images())
        .build(mock.client());

    let dialog = holidays.dialog();
    dialog.open(None);
    let outcome = dialog.submit(algarve_form()).await;

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(SessionError::MissingRequiredFile("image"))
    );
    assert_eq!(dialog.state(), DialogState::OpenForCreate);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_holiday_edit_keeps_existing_image() {
    let mut mock = MockStore::<Holiday>::new();
    let mut updated = algarve(4);
    updated.price = 599;
    mock.expect_update().return_ok(updated.clone());

    let holidays = ResourceManager::<Holiday>::builder().build(mock.client());
    let dialog = holidays.dialog();
    dialog.open(Some(algarve(4)));
    assert_eq!(dialog.form().price, 649);

    let form = HolidayForm {
        price: 599,
        ..dialog.form()
    };
    assert_eq!(dialog.submit(form).await, SubmitOutcome::Committed(updated));

    mock.verify();
    match &mock.calls()[..] {
        [MockCall::Update { id, payload, file }] => {
            assert_eq!(*id, HolidayId(4));
            assert_eq!(payload.price, 599);
            assert!(file.is_none());
        }
        calls => panic!("unexpected calls: {calls:?}"),
    }
}

#[tokio::test]
async fn test_carousel_accepts_images_and_videos_only() {
    let mock = MockStore::<CarouselSlide>::new();
    let staging = tempfile::tempdir().unwrap();
    let carousel = ResourceManager::<CarouselSlide>::builder()
        .upload_policies(
            Arc::new(UploadStager::new(staging.path())),
            media_policies(&UploadPolicy::images(), &UploadPolicy::videos()),
        )
        .build(mock.client());

    let dialog = carousel.dialog();
    dialog.open(None);

    let err = dialog
        .attach_file(UploadCandidate::new("brochure.pdf", "application/pdf", vec![1u8; 8]))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Upload(UploadError::UnsupportedType { .. })));
    assert!(dialog.staged_file().is_none());

    let staged = dialog
        .attach_file(UploadCandidate::new("beach.mp4", "video/mp4", vec![1u8; 8]))
        .await
        .unwrap();
    assert_eq!(staged.content_type, "video/mp4");
    assert!(staged.storage_path.exists());
    assert_eq!(dialog.staged_file(), Some(staged));
}

#[tokio::test]
async fn test_user_form_checked_before_sending() {
    let mock = MockStore::<User>::new();
    let users = ResourceManager::<User>::builder().build(mock.client());

    let dialog = users.dialog();
    dialog.open(None);
    let outcome = dialog
        .submit(UserForm {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            role: Role::Editor,
            password: Some("short".to_string()),
        })
        .await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Rejected(SessionError::ValidationFailed(_))
    ));
    assert!(mock.calls().is_empty());
    assert_eq!(
        users.notifications().current().unwrap().message,
        "Password must be at least 8 characters"
    );
}

#[tokio::test]
async fn test_closing_during_submit_detaches_response() {
    let (client, mut receiver) = create_mock_store::<Holiday>(10);
    let holidays = ResourceManager::<Holiday>::builder().build(client);
    let dialog = Arc::new(holidays.dialog());
    dialog.open(Some(algarve(4)));

    // Edits need no image, so the request goes straight out.
    let submitting = dialog.clone();
    let task = tokio::spawn(async move { submitting.submit(algarve_form()).await });

    let request = receiver.recv().await.unwrap();
    assert!(matches!(dialog.state(), DialogState::Submitting { .. }));
    dialog.close();

    match request {
        resource_framework::StoreRequest::Update { respond_to, .. } => {
            respond_to.send(Ok(algarve(4))).unwrap();
        }
        other => panic!("expected an update, got {other:?}"),
    }

    assert_eq!(task.await.unwrap(), SubmitOutcome::Detached);
    assert_eq!(dialog.state(), DialogState::Closed);
    assert!(holidays.notifications().current().is_none());
}

#[tokio::test]
async fn test_create_request_carries_staged_image() {
    let (client, mut receiver) = create_mock_store::<Holiday>(10);
    let staging = tempfile::tempdir().unwrap();
    let holidays = ResourceManager::<Holiday>::builder()
        .uploads(Arc::new(UploadStager::new(staging.path())), UploadPolicy::images())
        .build(client);
    let dialog = Arc::new(holidays.dialog());
    dialog.open(None);
    dialog
        .attach_file(UploadCandidate::new("algarve.png", "image/png", vec![7u8; 32]))
        .await
        .unwrap();

    let submitting = dialog.clone();
    let task = tokio::spawn(async move { submitting.submit(algarve_form()).await });

    let (payload, file, respond_to) = expect_create(&mut receiver).await.unwrap();
    assert_eq!(payload, algarve_form());
    let file = file.unwrap();
    assert_eq!(file.original_name, "algarve.png");
    assert_eq!(file.size_bytes, 32);
    respond_to.send(Ok(algarve(11))).unwrap();

    assert_eq!(task.await.unwrap(), SubmitOutcome::Committed(algarve(11)));
    assert!(dialog.staged_file().is_none());
}

fn carousel_dialog_in(
    staging: &std::path::Path,
) -> (MockStore<CarouselSlide>, ResourceManager<CarouselSlide>) {
    let mock = MockStore::<CarouselSlide>::new();
    let carousel = ResourceManager::<CarouselSlide>::builder()
        .upload_policies(
            Arc::new(UploadStager::new(staging)),
            media_policies(&UploadPolicy::images(), &UploadPolicy::videos()),
        )
        .build(mock.client());
    (mock, carousel)
}

#[tokio::test]
async fn test_carousel_image_held_to_image_ceiling() {
    let staging = tempfile::tempdir().unwrap();
    let (_mock, carousel) = carousel_dialog_in(staging.path());
    let dialog = carousel.dialog();
    dialog.open(None);

    let err = dialog
        .attach_file(UploadCandidate::new("huge.png", "image/png", vec![0u8; 20 * MIB]))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SessionError::Upload(UploadError::TooLarge {
            kind: "Image".to_string(),
            max_bytes: 5 * MIB as u64,
        })
    );
    assert!(dialog.staged_file().is_none());
    assert_eq!(
        carousel.notifications().current().unwrap().message,
        "Image size must be less than 5MB"
    );

    // The same size is fine for a video.
    dialog
        .attach_file(UploadCandidate::new("tour.mp4", "video/mp4", vec![0u8; 20 * MIB]))
        .await
        .unwrap();
    assert!(dialog.staged_file().is_some());
}

#[tokio::test]
async fn test_close_discards_staged_file() {
    let staging = tempfile::tempdir().unwrap();
    let (_mock, carousel) = carousel_dialog_in(staging.path());
    let dialog = carousel.dialog();
    dialog.open(None);
    dialog
        .attach_file(UploadCandidate::new("beach.png", "image/png", vec![1u8; 16]))
        .await
        .unwrap();
    assert!(dialog.staged_file().is_some());

    dialog.close();

    assert_eq!(dialog.state(), DialogState::Closed);
    assert!(dialog.staged_file().is_none());
    assert_eq!(dialog.form(), CarouselSlideForm::default());
}

#[tokio::test]
async fn test_closing_during_staging_detaches_file() {
    let staging = tempfile::tempdir().unwrap();
    let (_mock, carousel) = carousel_dialog_in(staging.path());
    let dialog = Arc::new(carousel.dialog());
    dialog.open(None);

    let attaching = dialog.clone();
    let task = tokio::spawn(async move {
        attaching
            .attach_file(UploadCandidate::new("beach.png", "image/png", vec![1u8; 16]))
            .await
    });
    // Let the attach reach the disk write, then close underneath it.
    tokio::task::yield_now().await;
    dialog.close();

    assert_eq!(task.await.unwrap(), Err(SessionError::Detached));
    assert!(dialog.staged_file().is_none());
    assert!(carousel.notifications().current().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_second_submit_while_first_in_flight_is_ignored() {
    let (client, mut receiver) = create_mock_store::<Holiday>(10);
    let holidays = ResourceManager::<Holiday>::builder().build(client);
    let dialog = Arc::new(holidays.dialog());
    dialog.open(Some(algarve(4)));

    let submitting = dialog.clone();
    let first = tokio::spawn(async move { submitting.submit(algarve_form()).await });
    let request = receiver.recv().await.unwrap();

    // Past the click cooldown; only the in-flight request blocks now.
    tokio::time::advance(Duration::from_millis(600)).await;
    assert_eq!(dialog.submit(algarve_form()).await, SubmitOutcome::Ignored);
    assert!(receiver.try_recv().is_err());

    match request {
        resource_framework::StoreRequest::Update { respond_to, .. } => {
            respond_to.send(Ok(algarve(4))).unwrap();
        }
        other => panic!("expected an update, got {other:?}"),
    }
    assert_eq!(first.await.unwrap(), SubmitOutcome::Committed(algarve(4)));
    assert!(receiver.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_second_confirm_while_delete_in_flight_is_ignored() {
    let (client, mut receiver) = create_mock_store::<Holiday>(10);
    let holidays = ResourceManager::<Holiday>::builder().build(client);
    let delete = Arc::new(holidays.delete_confirmation(None));
    assert!(delete.request_delete(HolidayId(4), "Algarve Escape"));

    let confirming = delete.clone();
    let first = tokio::spawn(async move { confirming.confirm().await });
    let (id, respond_to) = expect_delete(&mut receiver).await.unwrap();
    assert_eq!(id, HolidayId(4));

    tokio::time::advance(Duration::from_millis(600)).await;
    assert_eq!(delete.confirm().await, DeleteOutcome::Ignored);
    assert!(!delete.request_delete(HolidayId(5), "Lake Garda"));
    assert!(receiver.try_recv().is_err());

    respond_to.send(Ok(())).unwrap();
    assert_eq!(first.await.unwrap(), DeleteOutcome::Deleted);
    assert_eq!(delete.state(), DeleteState::Idle);
    assert!(receiver.try_recv().is_err());
}
