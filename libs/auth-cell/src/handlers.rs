use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use headers::{authorization::Bearer, Authorization, HeaderMapExt};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::extractor::ApiJson;
use shared_utils::jwt::validate_token as decode_token;
use shared_utils::AppState;

use crate::models::{LoginRequest, RegisterRequest};
use crate::services::CredentialService;

fn token_envelope(token: String) -> Json<Value> {
    Json(json!({
        "success": true,
        "token": token
    }))
}

#[axum::debug_handler(state = AppState)]
pub async fn register_patient(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    let token = CredentialService::new(&state).register_patient(request).await?;
    Ok(token_envelope(token))
}

#[axum::debug_handler(state = AppState)]
pub async fn login_patient(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let token = CredentialService::new(&state).login_patient(request).await?;
    Ok(token_envelope(token))
}

#[axum::debug_handler(state = AppState)]
pub async fn login_doctor(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let token = CredentialService::new(&state).login_doctor(request).await?;
    Ok(token_envelope(token))
}

#[axum::debug_handler(state = AppState)]
pub async fn login_admin(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let token = CredentialService::new(&state).login_admin(request)?;
    Ok(token_envelope(token))
}

pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let user = decode_token(bearer.token(), &config.jwt_secret)?;

    Ok(Json(TokenResponse {
        success: true,
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}
