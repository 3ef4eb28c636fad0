use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::ApiJson;
use shared_utils::AppState;

use crate::models::{CreatePaymentRequest, VerifyPaymentRequest};
use crate::services::PaymentService;

#[axum::debug_handler(state = AppState)]
pub async fn payment_razorpay(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(request): ApiJson<CreatePaymentRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = user.require_record(Role::Patient)?;
    let order = PaymentService::new(&state)
        .create_order(request.appointment_id, patient_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "order": order
    })))
}

#[axum::debug_handler(state = AppState)]
pub async fn verify_razorpay(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    ApiJson(request): ApiJson<VerifyPaymentRequest>,
) -> Result<Json<Value>, AppError> {
    user.require_role(Role::Patient)?;
    PaymentService::new(&state).confirm_payment(&request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Payment Successful"
    })))
}
