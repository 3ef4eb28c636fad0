use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::ApiJson;
use shared_utils::AppState;

use crate::models::{AppointmentIdRequest, AppointmentScope, BookAppointmentRequest, Canceller};
use crate::services::{AppointmentBookingService, DashboardService};

fn message(text: &str) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": text
    }))
}

async fn list(state: &AppState, scope: AppointmentScope) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentBookingService::new(&state.db)
        .list_for(scope)
        .await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

// ==============================================================================
// PATIENT HANDLERS
// ==============================================================================

#[axum::debug_handler(state = AppState)]
pub async fn book_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(request): ApiJson<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = user.require_record(Role::Patient)?;
    let appointment = AppointmentBookingService::new(&state.db)
        .book(patient_id, request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment Booked",
        "appointment": appointment
    })))
}

#[axum::debug_handler(state = AppState)]
pub async fn list_user_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient_id = user.require_record(Role::Patient)?;
    list(&state, AppointmentScope::Patient(patient_id)).await
}

#[axum::debug_handler(state = AppState)]
pub async fn cancel_user_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(request): ApiJson<AppointmentIdRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = user.require_record(Role::Patient)?;
    AppointmentBookingService::new(&state.db)
        .cancel(request.appointment_id, Canceller::Patient(patient_id))
        .await?;

    Ok(message("Appointment Cancelled"))
}

// ==============================================================================
// DOCTOR HANDLERS
// ==============================================================================

#[axum::debug_handler(state = AppState)]
pub async fn list_doctor_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = user.require_record(Role::Doctor)?;
    list(&state, AppointmentScope::Doctor(doctor_id)).await
}

#[axum::debug_handler(state = AppState)]
pub async fn complete_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(request): ApiJson<AppointmentIdRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = user.require_record(Role::Doctor)?;
    AppointmentBookingService::new(&state.db)
        .complete(request.appointment_id, doctor_id)
        .await?;

    Ok(message("Appointment Completed"))
}

#[axum::debug_handler(state = AppState)]
pub async fn cancel_doctor_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(request): ApiJson<AppointmentIdRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = user.require_record(Role::Doctor)?;
    AppointmentBookingService::new(&state.db)
        .cancel(request.appointment_id, Canceller::Doctor(doctor_id))
        .await?;

    Ok(message("Appointment Cancelled"))
}

#[axum::debug_handler(state = AppState)]
pub async fn doctor_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = user.require_record(Role::Doctor)?;
    let dashboard = DashboardService::new(&state.db)
        .doctor_dashboard(doctor_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "dashData": dashboard
    })))
}

// ==============================================================================
// ADMIN HANDLERS
// ==============================================================================

#[axum::debug_handler(state = AppState)]
pub async fn list_all_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    user.require_role(Role::Admin)?;
    list(&state, AppointmentScope::All).await
}

#[axum::debug_handler(state = AppState)]
pub async fn admin_cancel_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(request): ApiJson<AppointmentIdRequest>,
) -> Result<Json<Value>, AppError> {
    user.require_role(Role::Admin)?;
    AppointmentBookingService::new(&state.db)
        .cancel(request.appointment_id, Canceller::Admin)
        .await?;

    Ok(message("Appointment Cancelled"))
}

#[axum::debug_handler(state = AppState)]
pub async fn admin_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    user.require_role(Role::Admin)?;
    let dashboard = DashboardService::new(&state.db).admin_dashboard().await?;

    Ok(Json(json!({
        "success": true,
        "dashData": dashboard
    })))
}
