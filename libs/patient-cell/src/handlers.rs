use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::form::FormData;
use shared_utils::AppState;

use crate::services::PatientService;

#[axum::debug_handler(state = AppState)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient_id = user.require_record(Role::Patient)?;
    let profile = PatientService::new(&state).get_profile(patient_id).await?;

    Ok(Json(json!({
        "success": true,
        "userData": profile
    })))
}

#[axum::debug_handler(state = AppState)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    form: FormData,
) -> Result<Json<Value>, AppError> {
    let patient_id = user.require_record(Role::Patient)?;
    PatientService::new(&state)
        .update_profile(patient_id, form)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile Updated"
    })))
}
