use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::{Extension, State};
use futures::future::join_all;
use uuid::Uuid;

use appointment_cell::handlers::{admin_dashboard, book_appointment, cancel_user_appointment};
use appointment_cell::{
    AppointmentBookingService, AppointmentError, AppointmentIdRequest, AppointmentScope,
    BookAppointmentRequest, Canceller, DashboardService, SlotService,
};
use shared_database::{Database, MemoryDatabase};
use shared_models::appointment::AppointmentUpdate;
use shared_models::doctor::DoctorUpdate;
use shared_models::error::AppError;
use shared_models::slot::SlotKey;
use shared_utils::extractor::ApiJson;
use shared_utils::test_utils::{seed_doctor, seed_patient, test_state, TestUser};

// Keeps creation timestamps strictly ordered.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(2)).await;
}

fn request(doc_id: Uuid, date: &str, time: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        doc_id,
        slot_date: date.to_string(),
        slot_time: time.to_string(),
    }
}

#[tokio::test]
async fn booking_takes_the_slot_and_freezes_the_fee() {
    let db = Database::in_memory();
    let doctor = seed_doctor(&db, "Dr. A", 500.0).await.unwrap();
    let patient = seed_patient(&db, "P").await.unwrap();
    let service = AppointmentBookingService::new(&db);

    let appointment = service
        .book(patient.id, request(doctor.id, "2024-05-01", "10:00"))
        .await
        .unwrap();

    assert_eq!(appointment.amount, 500.0);
    assert!(!appointment.cancelled && !appointment.payment && !appointment.is_completed);
    assert_eq!(appointment.user_data.name, "P");
    assert_eq!(appointment.doc_data.name, "Dr. A");

    let key = SlotKey::new(doctor.id, "2024-05-01", "10:00");
    assert!(!SlotService::new(&db).is_available(&key).await.unwrap());

    // Later fee changes never touch the booked amount.
    db.doctors
        .update_doctor(doctor.id, DoctorUpdate { fees: Some(900.0), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(service.get(appointment.id).await.unwrap().amount, 500.0);
}

#[tokio::test]
async fn taken_slot_frees_up_after_cancellation() {
    let db = Database::in_memory();
    let doctor = seed_doctor(&db, "Dr. A", 500.0).await.unwrap();
    let p1 = seed_patient(&db, "P").await.unwrap();
    let p2 = seed_patient(&db, "P2").await.unwrap();
    let service = AppointmentBookingService::new(&db);

    let first = service
        .book(p1.id, request(doctor.id, "2024-05-01", "10:00"))
        .await
        .unwrap();

    assert_matches!(
        service.book(p2.id, request(doctor.id, "2024-05-01", "10:00")).await,
        Err(AppointmentError::SlotTaken)
    );

    let cancelled = service.cancel(first.id, Canceller::Patient(p1.id)).await.unwrap();
    assert!(cancelled.cancelled);
    assert!(!cancelled.payment);

    let second = service
        .book(p2.id, request(doctor.id, "2024-05-01", "10:00"))
        .await
        .unwrap();
    assert_eq!(second.user_id, p2.id);
}

#[tokio::test]
async fn paid_appointment_can_be_cancelled_and_keeps_its_payment() {
    let db = Database::in_memory();
    let doctor = seed_doctor(&db, "Dr. A", 500.0).await.unwrap();
    let patient = seed_patient(&db, "P").await.unwrap();
    let service = AppointmentBookingService::new(&db);

    let appointment = service
        .book(patient.id, request(doctor.id, "2024-05-01", "10:00"))
        .await
        .unwrap();
    db.appointments
        .update_appointment(appointment.id, AppointmentUpdate::paid())
        .await
        .unwrap();

    let cancelled = service
        .cancel(appointment.id, Canceller::Patient(patient.id))
        .await
        .unwrap();
    assert!(cancelled.payment);
    assert!(cancelled.cancelled);

    let stored = service.get(appointment.id).await.unwrap();
    assert!(stored.payment && stored.cancelled && !stored.is_completed);

    let key = SlotKey::new(doctor.id, "2024-05-01", "10:00");
    assert!(SlotService::new(&db).is_available(&key).await.unwrap());

    // Paid then cancelled still counts towards earnings.
    let dashboard = DashboardService::new(&db).doctor_dashboard(doctor.id).await.unwrap();
    assert_eq!(dashboard.earnings, 500.0);
}

#[tokio::test]
async fn repeated_cancel_never_frees_someone_elses_booking() {
    let db = Database::in_memory();
    let doctor = seed_doctor(&db, "Dr. A", 500.0).await.unwrap();
    let p1 = seed_patient(&db, "P").await.unwrap();
    let p2 = seed_patient(&db, "P2").await.unwrap();
    let service = AppointmentBookingService::new(&db);

    let first = service
        .book(p1.id, request(doctor.id, "2024-05-01", "10:00"))
        .await
        .unwrap();
    service.cancel(first.id, Canceller::Patient(p1.id)).await.unwrap();
    service
        .book(p2.id, request(doctor.id, "2024-05-01", "10:00"))
        .await
        .unwrap();

    // Cancelling the old appointment again succeeds but leaves P2's slot alone.
    service.cancel(first.id, Canceller::Patient(p1.id)).await.unwrap();
    let key = SlotKey::new(doctor.id, "2024-05-01", "10:00");
    assert!(!SlotService::new(&db).is_available(&key).await.unwrap());
}

#[tokio::test]
async fn cancel_and_complete_enforce_ownership() {
    let db = Database::in_memory();
    let doctor = seed_doctor(&db, "Dr. A", 500.0).await.unwrap();
    let other_doctor = seed_doctor(&db, "Dr. B", 300.0).await.unwrap();
    let owner = seed_patient(&db, "P").await.unwrap();
    let stranger = seed_patient(&db, "Q").await.unwrap();
    let service = AppointmentBookingService::new(&db);

    let appointment = service
        .book(owner.id, request(doctor.id, "2024-05-01", "10:00"))
        .await
        .unwrap();

    assert_matches!(
        service.cancel(appointment.id, Canceller::Patient(stranger.id)).await,
        Err(AppointmentError::Unauthorized)
    );
    assert_matches!(
        service.cancel(appointment.id, Canceller::Doctor(other_doctor.id)).await,
        Err(AppointmentError::Unauthorized)
    );
    assert_matches!(
        service.complete(appointment.id, other_doctor.id).await,
        Err(AppointmentError::Unauthorized)
    );
    assert_matches!(
        service.cancel(Uuid::new_v4(), Canceller::Admin).await,
        Err(AppointmentError::NotFound)
    );
}

#[tokio::test]
async fn completion_keeps_the_slot_and_blocks_cancellation() {
    let db = Database::in_memory();
    let doctor = seed_doctor(&db, "Dr. A", 500.0).await.unwrap();
    let patient = seed_patient(&db, "P").await.unwrap();
    let service = AppointmentBookingService::new(&db);

    let appointment = service
        .book(patient.id, request(doctor.id, "2024-05-01", "10:00"))
        .await
        .unwrap();

    let completed = service.complete(appointment.id, doctor.id).await.unwrap();
    assert!(completed.is_completed);
    assert!(service.complete(appointment.id, doctor.id).await.unwrap().is_completed);

    let key = SlotKey::new(doctor.id, "2024-05-01", "10:00");
    assert!(!SlotService::new(&db).is_available(&key).await.unwrap());

    assert_matches!(
        service.cancel(appointment.id, Canceller::Admin).await,
        Err(AppointmentError::AlreadyCompleted)
    );
}

#[tokio::test]
async fn doctors_and_admins_can_cancel_and_release() {
    let db = Database::in_memory();
    let doctor = seed_doctor(&db, "Dr. A", 500.0).await.unwrap();
    let patient = seed_patient(&db, "P").await.unwrap();
    let service = AppointmentBookingService::new(&db);
    let slots = SlotService::new(&db);

    let by_doctor = service
        .book(patient.id, request(doctor.id, "2024-05-01", "10:00"))
        .await
        .unwrap();
    service.cancel(by_doctor.id, Canceller::Doctor(doctor.id)).await.unwrap();
    assert!(slots.is_available(&by_doctor.slot()).await.unwrap());

    let by_admin = service
        .book(patient.id, request(doctor.id, "2024-05-01", "11:00"))
        .await
        .unwrap();
    service.cancel(by_admin.id, Canceller::Admin).await.unwrap();
    assert!(slots.is_available(&by_admin.slot()).await.unwrap());

    assert_matches!(
        service.complete(by_admin.id, doctor.id).await,
        Err(AppointmentError::AlreadyCancelled)
    );
}

#[tokio::test]
async fn unknown_parties_and_unavailable_doctors_are_rejected() {
    let db = Database::in_memory();
    let doctor = seed_doctor(&db, "Dr. A", 500.0).await.unwrap();
    let patient = seed_patient(&db, "P").await.unwrap();
    let service = AppointmentBookingService::new(&db);

    assert_matches!(
        service.book(patient.id, request(Uuid::new_v4(), "2024-05-01", "10:00")).await,
        Err(AppointmentError::DoctorNotFound)
    );
    assert_matches!(
        service.book(Uuid::new_v4(), request(doctor.id, "2024-05-01", "10:00")).await,
        Err(AppointmentError::PatientNotFound)
    );
    assert_matches!(
        service.book(patient.id, request(doctor.id, " ", "10:00")).await,
        Err(AppointmentError::ValidationError(_))
    );

    db.doctors
        .update_doctor(doctor.id, DoctorUpdate { available: Some(false), ..Default::default() })
        .await
        .unwrap();
    assert_matches!(
        service.book(patient.id, request(doctor.id, "2024-05-01", "10:00")).await,
        Err(AppointmentError::DoctorUnavailable)
    );
}

#[tokio::test]
async fn concurrent_bookings_of_one_slot_have_one_winner() {
    let memory = Arc::new(MemoryDatabase::default());
    let db = Database::from_memory(memory);
    let doctor = seed_doctor(&db, "Dr. A", 500.0).await.unwrap();

    let mut patients = Vec::new();
    for i in 0..16 {
        patients.push(seed_patient(&db, &format!("P{}", i)).await.unwrap());
    }

    let attempts = patients.iter().map(|patient| {
        let db = db.clone();
        let patient_id = patient.id;
        let doc_id = doctor.id;
        tokio::spawn(async move {
            AppointmentBookingService::new(&db)
                .book(patient_id, request(doc_id, "2024-05-01", "10:00"))
                .await
        })
    });

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let winners = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter_map(|result| result.as_ref().err())
        .all(|err| matches!(err, AppointmentError::SlotTaken)));
    assert_eq!(db.appointments.count_appointments().await.unwrap(), 1);
}

#[tokio::test]
async fn listings_are_newest_first_and_scoped() {
    let db = Database::in_memory();
    let doctor = seed_doctor(&db, "Dr. A", 500.0).await.unwrap();
    let p1 = seed_patient(&db, "P").await.unwrap();
    let p2 = seed_patient(&db, "Q").await.unwrap();
    let service = AppointmentBookingService::new(&db);

    let first = service.book(p1.id, request(doctor.id, "d1", "t1")).await.unwrap();
    tick().await;
    let second = service.book(p1.id, request(doctor.id, "d1", "t2")).await.unwrap();
    tick().await;
    service.book(p2.id, request(doctor.id, "d1", "t3")).await.unwrap();

    let mine = service.list_for(AppointmentScope::Patient(p1.id)).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].id, second.id);
    assert_eq!(mine[1].id, first.id);

    assert_eq!(service.list_for(AppointmentScope::Doctor(doctor.id)).await.unwrap().len(), 3);
    assert_eq!(service.list_for(AppointmentScope::All).await.unwrap().len(), 3);
}

#[tokio::test]
async fn doctor_dashboard_counts_completed_or_paid_earnings() {
    let db = Database::in_memory();
    let doctor = seed_doctor(&db, "Dr. A", 100.0).await.unwrap();
    let p1 = seed_patient(&db, "P").await.unwrap();
    let p2 = seed_patient(&db, "Q").await.unwrap();
    let service = AppointmentBookingService::new(&db);

    let mut booked = Vec::new();
    for (i, patient) in [&p1, &p1, &p2, &p2, &p1, &p2, &p1].iter().enumerate() {
        booked.push(
            service
                .book(patient.id, request(doctor.id, "d1", &format!("t{}", i)))
                .await
                .unwrap(),
        );
        tick().await;
    }

    service.complete(booked[0].id, doctor.id).await.unwrap();
    db.appointments
        .update_appointment(booked[1].id, AppointmentUpdate::paid())
        .await
        .unwrap();
    service.cancel(booked[2].id, Canceller::Doctor(doctor.id)).await.unwrap();

    let dashboard = DashboardService::new(&db).doctor_dashboard(doctor.id).await.unwrap();
    assert_eq!(dashboard.earnings, 200.0);
    assert_eq!(dashboard.appointments, 7);
    assert_eq!(dashboard.patients, 2);
    assert_eq!(dashboard.latest_appointments.len(), 5);
    assert_eq!(dashboard.latest_appointments[0].id, booked[6].id);
}

#[tokio::test]
async fn admin_dashboard_counts_everything_and_shows_the_newest_five() {
    let db = Database::in_memory();
    let a = seed_doctor(&db, "Dr. A", 100.0).await.unwrap();
    let b = seed_doctor(&db, "Dr. B", 200.0).await.unwrap();
    let patient = seed_patient(&db, "P").await.unwrap();
    let service = AppointmentBookingService::new(&db);

    let mut booked = Vec::new();
    for (i, doctor) in [&a, &b, &a, &b, &a, &b, &a].iter().enumerate() {
        booked.push(
            service
                .book(patient.id, request(doctor.id, "d1", &format!("t{}", i)))
                .await
                .unwrap(),
        );
        tick().await;
    }

    let dashboard = DashboardService::new(&db).admin_dashboard().await.unwrap();
    assert_eq!(dashboard.doctors, 2);
    assert_eq!(dashboard.patients, 1);
    assert_eq!(dashboard.appointments, 7);
    let latest: Vec<Uuid> = dashboard.latest_appointments.iter().map(|a| a.id).collect();
    let expected: Vec<Uuid> = booked.iter().rev().take(5).map(|a| a.id).collect();
    assert_eq!(latest, expected);
}

#[tokio::test]
async fn handlers_check_the_role_claim() {
    let t = test_state();
    let doctor = seed_doctor(t.db(), "Dr. A", 500.0).await.unwrap();
    let patient = seed_patient(t.db(), "P").await.unwrap();
    let as_patient = TestUser::patient(&patient).to_user();
    let as_doctor = TestUser::doctor(&doctor).to_user();

    let response = book_appointment(
        State(t.state.clone()),
        Extension(as_patient.clone()),
        ApiJson(request(doctor.id, "2024-05-01", "10:00")),
    )
    .await
    .unwrap();
    assert_eq!(response.0["success"], true);
    let appointment_id: Uuid =
        serde_json::from_value(response.0["appointment"]["id"].clone()).unwrap();

    let rejected = cancel_user_appointment(
        State(t.state.clone()),
        Extension(as_doctor.clone()),
        ApiJson(AppointmentIdRequest { appointment_id }),
    )
    .await;
    assert_matches!(rejected, Err(AppError::Auth(_)));

    let rejected = admin_dashboard(State(t.state.clone()), Extension(as_doctor)).await;
    assert_matches!(rejected, Err(AppError::Auth(_)));

    let admin = TestUser::admin(&t.config.admin_email).to_user();
    let dashboard = admin_dashboard(State(t.state.clone()), Extension(admin)).await.unwrap();
    assert_eq!(dashboard.0["dashData"]["doctors"], 1);
    assert_eq!(dashboard.0["dashData"]["patients"], 1);
    assert_eq!(dashboard.0["dashData"]["appointments"], 1);
    assert_eq!(dashboard.0["dashData"]["latestAppointments"][0]["id"], appointment_id.to_string());
    assert!(dashboard.0["dashData"].get("latest_appointments").is_none());
}
