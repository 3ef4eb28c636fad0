use assert_matches::assert_matches;
use axum::extract::{Extension, State};
use chrono::NaiveDate;

use patient_cell::handlers::get_profile;
use patient_cell::{PatientError, PatientService};
use shared_integrations::UploadedImage;
use shared_models::error::AppError;
use shared_models::patient::DEFAULT_PHONE;
use shared_utils::form::FormData;
use shared_utils::test_utils::{seed_doctor, seed_patient, test_state, FormFields, TestUser};

fn profile_form() -> FormData {
    FormData::default()
        .with_field("name", "Jane Cooper")
        .with_field("phone", "9876543210")
        .with_field("address", r#"{"line1":"57th Cross","line2":"Richmond"}"#)
        .with_field("gender", "Female")
        .with_field("dob", "1994-03-12")
}

#[tokio::test]
async fn fresh_patients_have_default_phone() {
    let t = test_state();
    let patient = seed_patient(t.db(), "Jane").await.unwrap();

    let profile = PatientService::new(&t.state)
        .get_profile(patient.id)
        .await
        .unwrap();
    assert_eq!(profile.phone, DEFAULT_PHONE);
    assert!(profile.dob.is_none());
}

#[tokio::test]
async fn update_profile_applies_every_field_and_image() {
    let t = test_state();
    let patient = seed_patient(t.db(), "Jane").await.unwrap();

    let mut form = profile_form();
    form.image = Some(UploadedImage {
        file_name: Some("jane.jpg".to_string()),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xff, 0xd8],
    });

    let profile = PatientService::new(&t.state)
        .update_profile(patient.id, form)
        .await
        .unwrap();

    assert_eq!(profile.name, "Jane Cooper");
    assert_eq!(profile.phone, "9876543210");
    assert_eq!(profile.address.line1, "57th Cross");
    assert_eq!(profile.gender.as_deref(), Some("Female"));
    assert_eq!(profile.dob, NaiveDate::from_ymd_opt(1994, 3, 12));
    assert_eq!(profile.image.as_deref(), Some("https://images.test/patients/jane.jpg"));
}

#[tokio::test]
async fn missing_required_field_is_data_missing() {
    let t = test_state();
    let patient = seed_patient(t.db(), "Jane").await.unwrap();

    let form = profile_form().with_field("gender", "");
    let result = PatientService::new(&t.state)
        .update_profile(patient.id, form)
        .await;
    assert_matches!(result, Err(PatientError::MissingDetails));
}

#[test]
fn unselected_dob_is_skipped_and_bad_dates_rejected() {
    let update = PatientService::parse_update(&profile_form().with_field("dob", "Not Selected")).unwrap();
    assert!(update.dob.is_none());

    assert_matches!(
        PatientService::parse_update(&profile_form().with_field("dob", "12/03/1994")),
        Err(PatientError::ValidationError(_))
    );
}

#[tokio::test]
async fn doctor_tokens_cannot_read_patient_profiles() {
    let t = test_state();
    let doctor = seed_doctor(t.db(), "Dr. Richard James", 50.0).await.unwrap();

    let result = get_profile(State(t.state.clone()), Extension(TestUser::doctor(&doctor).to_user())).await;
    assert_matches!(result, Err(AppError::Auth(_)));
}
