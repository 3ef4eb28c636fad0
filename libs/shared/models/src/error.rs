use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::ExternalService(msg)
            | AppError::Database(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

// Clients only ever see `{success: false, message}` on a 200.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::ExternalService(_) | AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!("Request failed: {}", self)
            }
            _ => tracing::warn!("Request rejected: {}", self),
        }

        let body = Json(json!({
            "success": false,
            "message": self.message()
        }));

        (StatusCode::OK, body).into_response()
    }
}
