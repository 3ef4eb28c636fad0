use assert_matches::assert_matches;
use axum::extract::{Extension, Query, State};

use doctor_cell::handlers::{add_doctor, change_availability, list_doctors};
use doctor_cell::{ChangeAvailabilityRequest, DoctorError, DoctorListQuery, DoctorService, UpdateDoctorProfileRequest};
use shared_integrations::UploadedImage;
use shared_models::address::Address;
use shared_models::error::AppError;
use shared_models::slot::{SlotKey, SlotReservation};
use shared_utils::extractor::ApiJson;
use shared_utils::form::FormData;
use shared_utils::test_utils::{
    doctor_record, seed_doctor, seed_patient, test_state, FormFields, TestUser,
};
use uuid::Uuid;

fn doctor_form(email: &str) -> FormData {
    FormData::default()
        .with_field("name", "Dr. Christopher Lee")
        .with_field("email", email)
        .with_field("password", "christopher")
        .with_field("speciality", "Pediatricians")
        .with_field("degree", "MBBS")
        .with_field("experience", "2 Years")
        .with_field("about", "Children's health")
        .with_field("fees", "40")
        .with_field("address", r#"{"line1":"47th Cross","line2":"Richmond"}"#)
}

#[tokio::test]
async fn add_doctor_hashes_password_and_uploads_image() {
    let t = test_state();
    let mut form = doctor_form("chris@prescripto.test");
    form.image = Some(UploadedImage {
        file_name: Some("chris.png".to_string()),
        content_type: "image/png".to_string(),
        bytes: vec![1, 2, 3],
    });

    let doctor = DoctorService::new(&t.state).add_doctor(form).await.unwrap();

    assert!(doctor.available);
    assert_ne!(doctor.password_hash, "christopher");
    assert_eq!(doctor.image.as_deref(), Some("https://images.test/doctors/chris.png"));
    assert_eq!(t.images.uploaded().await.len(), 1);
}

#[tokio::test]
async fn add_doctor_without_image_is_allowed_but_non_images_are_not() {
    let t = test_state();
    let service = DoctorService::new(&t.state);

    let doctor = service.add_doctor(doctor_form("a@prescripto.test")).await.unwrap();
    assert!(doctor.image.is_none());

    let mut form = doctor_form("b@prescripto.test");
    form.image = Some(UploadedImage {
        file_name: Some("notes.txt".to_string()),
        content_type: "text/plain".to_string(),
        bytes: b"hello".to_vec(),
    });
    assert_matches!(service.add_doctor(form).await, Err(DoctorError::ValidationError(_)));
}

#[tokio::test]
async fn duplicate_doctor_email_is_rejected() {
    let t = test_state();
    let service = DoctorService::new(&t.state);

    service.add_doctor(doctor_form("dup@prescripto.test")).await.unwrap();
    assert_matches!(
        service.add_doctor(doctor_form("DUP@prescripto.test")).await,
        Err(DoctorError::EmailTaken)
    );
}

#[tokio::test]
async fn public_listing_filters_by_speciality_and_shows_booked_slots() {
    let t = test_state();
    let general = seed_doctor(t.db(), "Dr. Richard James", 50.0).await.unwrap();

    let mut derm = doctor_record("Dr. Sarah Patel", "sarah@prescripto.test", 30.0);
    derm.speciality = "Dermatologist".to_string();
    t.db().doctors.insert_doctor(derm).await.unwrap();

    t.db()
        .slots
        .reserve_slot(SlotReservation::new(
            SlotKey::new(general.id, "1_5_2024", "10:00 AM"),
            Uuid::new_v4(),
        ))
        .await
        .unwrap();

    let service = DoctorService::new(&t.state);
    assert_eq!(service.list_public(None).await.unwrap().len(), 2);

    let generals = service.list_public(Some("general physician")).await.unwrap();
    assert_eq!(generals.len(), 1);
    assert!(generals[0].slots_booked["1_5_2024"].contains("10:00 AM"));

    let response = list_doctors(
        State(t.state.clone()),
        Query(DoctorListQuery {
            speciality: Some("Dermatologist".to_string()),
        }),
    )
    .await
    .unwrap();
    let doctors = response.0["doctors"].as_array().unwrap().clone();
    assert_eq!(doctors.len(), 1);
    assert!(doctors[0].get("password_hash").is_none());
    assert!(doctors[0].get("email").is_none());
}

#[tokio::test]
async fn doctors_update_their_own_profile() {
    let t = test_state();
    let doctor = seed_doctor(t.db(), "Dr. Richard James", 50.0).await.unwrap();
    let service = DoctorService::new(&t.state);

    let profile = service
        .update_profile(
            doctor.id,
            UpdateDoctorProfileRequest {
                fees: Some(75.0),
                address: Some(Address::new("1 New Street", "London")),
                available: Some(false),
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.fees, 75.0);
    assert!(!profile.available);
    assert_eq!(profile.address.line1, "1 New Street");

    assert_matches!(
        service
            .update_profile(doctor.id, UpdateDoctorProfileRequest { fees: Some(0.0), ..Default::default() })
            .await,
        Err(DoctorError::ValidationError(_))
    );
    assert_matches!(
        service.profile(Uuid::new_v4()).await,
        Err(DoctorError::NotFound)
    );
}

#[tokio::test]
async fn availability_toggles_each_call() {
    let t = test_state();
    let doctor = seed_doctor(t.db(), "Dr. Richard James", 50.0).await.unwrap();
    let service = DoctorService::new(&t.state);

    assert!(!service.change_availability(doctor.id).await.unwrap());
    assert!(service.change_availability(doctor.id).await.unwrap());
}

#[tokio::test]
async fn admin_handlers_reject_other_roles() {
    let t = test_state();
    let doctor = seed_doctor(t.db(), "Dr. Richard James", 50.0).await.unwrap();
    let patient = seed_patient(t.db(), "Jane").await.unwrap();
    let as_patient = TestUser::patient(&patient).to_user();

    let result = change_availability(
        State(t.state.clone()),
        Extension(as_patient.clone()),
        ApiJson(ChangeAvailabilityRequest { doc_id: doctor.id }),
    )
    .await;
    assert_matches!(result, Err(AppError::Auth(_)));

    let result = add_doctor(
        State(t.state.clone()),
        Extension(as_patient),
        doctor_form("x@prescripto.test"),
    )
    .await;
    assert_matches!(result, Err(AppError::Auth(_)));

    let admin = TestUser::admin(&t.config.admin_email).to_user();
    let response = add_doctor(
        State(t.state.clone()),
        Extension(admin),
        doctor_form("x@prescripto.test"),
    )
    .await
    .unwrap();
    assert_eq!(response.0["message"], "Doctor Added");
}
