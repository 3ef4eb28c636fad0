use assert_matches::assert_matches;
use axum::extract::{Extension, State};
use uuid::Uuid;

use payment_cell::handlers::{payment_razorpay, verify_razorpay};
use payment_cell::{CreatePaymentRequest, PaymentError, PaymentService, VerifyPaymentRequest};
use shared_integrations::razorpay::payment_signature;
use shared_models::appointment::{AppointmentRecord, AppointmentUpdate};
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::extractor::ApiJson;
use shared_utils::test_utils::{seed_doctor, seed_patient, test_state, TestState, TestUser};

async fn booked_appointment(t: &TestState, fees: f64) -> AppointmentRecord {
    let doctor = seed_doctor(t.db(), "Dr. A", fees).await.unwrap();
    let patient = seed_patient(t.db(), "P").await.unwrap();
    let record = AppointmentRecord::book(
        Uuid::new_v4(),
        &patient,
        &doctor,
        "2024-05-01".to_string(),
        "10:00".to_string(),
    );
    t.db().appointments.insert_appointment(record).await.unwrap()
}

fn verify_request(order_id: &str) -> VerifyPaymentRequest {
    VerifyPaymentRequest {
        razorpay_order_id: order_id.to_string(),
        razorpay_payment_id: None,
        razorpay_signature: None,
    }
}

#[tokio::test]
async fn order_carries_amount_in_minor_units_and_appointment_receipt() {
    let t = test_state();
    let appointment = booked_appointment(&t, 500.0).await;

    let order = PaymentService::new(&t.state)
        .create_order(appointment.id, appointment.user_id)
        .await
        .unwrap();

    assert_eq!(order.amount, 50_000);
    assert_eq!(order.currency, t.state.config.currency);
    assert_eq!(order.receipt, Some(appointment.id.to_string()));
    assert_eq!(t.payments.order_count().await, 1);
}

#[tokio::test]
async fn orders_are_refused_for_unknown_foreign_or_cancelled_appointments() {
    let t = test_state();
    let appointment = booked_appointment(&t, 500.0).await;
    let service = PaymentService::new(&t.state);

    assert_matches!(
        service.create_order(Uuid::new_v4(), appointment.user_id).await,
        Err(PaymentError::NotFound)
    );
    assert_matches!(
        service.create_order(appointment.id, Uuid::new_v4()).await,
        Err(PaymentError::Unauthorized)
    );

    t.db()
        .appointments
        .update_appointment(appointment.id, AppointmentUpdate::cancelled())
        .await
        .unwrap();
    assert_matches!(
        service.create_order(appointment.id, appointment.user_id).await,
        Err(PaymentError::Cancelled)
    );
    assert_eq!(t.payments.order_count().await, 0);
}

#[tokio::test]
async fn zero_amount_appointments_cannot_be_paid() {
    let t = test_state();
    let appointment = booked_appointment(&t, 0.0).await;

    assert_matches!(
        PaymentService::new(&t.state)
            .create_order(appointment.id, appointment.user_id)
            .await,
        Err(PaymentError::InvalidAmount)
    );
}

#[tokio::test]
async fn confirmation_follows_the_gateway_order_status() {
    let t = test_state();
    let appointment = booked_appointment(&t, 500.0).await;
    let service = PaymentService::new(&t.state);
    let order = service
        .create_order(appointment.id, appointment.user_id)
        .await
        .unwrap();

    assert_matches!(
        service.confirm_payment(&verify_request(&order.id)).await,
        Err(PaymentError::NotPaid)
    );
    let stored = t.db().appointments.get_appointment(appointment.id).await.unwrap().unwrap();
    assert!(!stored.payment);

    t.payments.mark_paid(&order.id).await;
    let paid = service.confirm_payment(&verify_request(&order.id)).await.unwrap();
    assert!(paid.payment);
    assert!(!paid.cancelled);
}

#[tokio::test]
async fn forwarded_signatures_must_match() {
    let t = test_state();
    let appointment = booked_appointment(&t, 500.0).await;
    let service = PaymentService::new(&t.state);
    let order = service
        .create_order(appointment.id, appointment.user_id)
        .await
        .unwrap();
    t.payments.mark_paid(&order.id).await;

    let forged = VerifyPaymentRequest {
        razorpay_order_id: order.id.clone(),
        razorpay_payment_id: Some("pay_123".to_string()),
        razorpay_signature: Some("deadbeef".to_string()),
    };
    assert_matches!(
        service.confirm_payment(&forged).await,
        Err(PaymentError::InvalidSignature)
    );

    let signed = VerifyPaymentRequest {
        razorpay_signature: Some(payment_signature(
            &t.config.razorpay_key_secret,
            &order.id,
            "pay_123",
        )),
        ..forged
    };
    assert!(service.confirm_payment(&signed).await.unwrap().payment);
}

#[tokio::test]
async fn unknown_orders_surface_as_gateway_errors() {
    let t = test_state();

    let result = PaymentService::new(&t.state)
        .confirm_payment(&verify_request("order_missing"))
        .await;
    assert_matches!(result, Err(PaymentError::Gateway(_)));
}

#[tokio::test]
async fn handlers_wrap_the_payment_flow() {
    let t = test_state();
    let appointment = booked_appointment(&t, 250.0).await;
    let owner = TestUser::new(appointment.user_id.to_string(), "p@patients.test", Role::Patient).to_user();

    let response = payment_razorpay(
        State(t.state.clone()),
        Extension(owner.clone()),
        ApiJson(CreatePaymentRequest { appointment_id: appointment.id }),
    )
    .await
    .unwrap();
    assert_eq!(response.0["success"], true);
    assert_eq!(response.0["order"]["amount"], 25_000);
    let order_id = response.0["order"]["id"].as_str().unwrap().to_string();

    let unpaid = verify_razorpay(
        State(t.state.clone()),
        Extension(owner.clone()),
        ApiJson(verify_request(&order_id)),
    )
    .await;
    assert_matches!(unpaid, Err(AppError::ValidationError(message)) if message == "Payment Failed");

    t.payments.mark_paid(&order_id).await;
    let paid = verify_razorpay(
        State(t.state.clone()),
        Extension(owner),
        ApiJson(verify_request(&order_id)),
    )
    .await
    .unwrap();
    assert_eq!(paid.0["message"], "Payment Successful");

    let admin = TestUser::admin(&t.config.admin_email).to_user();
    let rejected = payment_razorpay(
        State(t.state.clone()),
        Extension(admin),
        ApiJson(CreatePaymentRequest { appointment_id: appointment.id }),
    )
    .await;
    assert_matches!(rejected, Err(AppError::Auth(_)));
}
