use serde::{Deserialize, Serialize};

use shared_database::DatabaseError;
use shared_models::error::AppError;
use shared_utils::jwt::TokenError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Details")]
    MissingDetails,

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("Please enter a strong password")]
    WeakPassword,

    #[error("User already exists")]
    EmailTaken,

    #[error("User does not exist")]
    NotFound,

    #[error("Invalid credentials")]
    Mismatch,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingDetails | AuthError::InvalidEmail | AuthError::WeakPassword => {
                AppError::ValidationError(err.to_string())
            }
            AuthError::EmailTaken => AppError::Conflict(err.to_string()),
            AuthError::NotFound => AppError::NotFound(err.to_string()),
            AuthError::Mismatch => AppError::Auth(err.to_string()),
            AuthError::Hashing(_) => AppError::Internal(err.to_string()),
            AuthError::Token(e) => e.into(),
            AuthError::Database(DatabaseError::Conflict(_)) => {
                AppError::Conflict(AuthError::EmailTaken.to_string())
            }
            AuthError::Database(e) => e.into(),
        }
    }
}
