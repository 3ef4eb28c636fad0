use axum::{
    extract::{Extension, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::ApiJson;
use shared_utils::form::FormData;
use shared_utils::AppState;

use crate::models::{ChangeAvailabilityRequest, DoctorListQuery, UpdateDoctorProfileRequest};
use crate::services::DoctorService;

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler(state = AppState)]
pub async fn list_doctors(
    State(state): State<AppState>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    let doctors = DoctorService::new(&state)
        .list_public(query.speciality.as_deref())
        .await?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors
    })))
}

// ==============================================================================
// DOCTOR HANDLERS
// ==============================================================================

#[axum::debug_handler(state = AppState)]
pub async fn doctor_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = user.require_record(Role::Doctor)?;
    let profile = DoctorService::new(&state).profile(doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "profileData": profile
    })))
}

#[axum::debug_handler(state = AppState)]
pub async fn update_doctor_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(request): ApiJson<UpdateDoctorProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_id = user.require_record(Role::Doctor)?;
    DoctorService::new(&state)
        .update_profile(doctor_id, request)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile Updated"
    })))
}

// ==============================================================================
// ADMIN HANDLERS
// ==============================================================================

#[axum::debug_handler(state = AppState)]
pub async fn add_doctor(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    form: FormData,
) -> Result<Json<Value>, AppError> {
    user.require_role(Role::Admin)?;
    DoctorService::new(&state).add_doctor(form).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor Added"
    })))
}

#[axum::debug_handler(state = AppState)]
pub async fn all_doctors(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    user.require_role(Role::Admin)?;
    let doctors = DoctorService::new(&state).list_all().await?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors
    })))
}

#[axum::debug_handler(state = AppState)]
pub async fn change_availability(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(request): ApiJson<ChangeAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    user.require_role(Role::Admin)?;
    DoctorService::new(&state)
        .change_availability(request.doc_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Availability Changed"
    })))
}
