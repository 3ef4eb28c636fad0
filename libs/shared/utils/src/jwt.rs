use chrono::{Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtClaims, Role, User};
use shared_models::error::AppError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("JWT secret is not set")]
    MissingSecret,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::MissingSecret | TokenError::Signing(_) => AppError::Internal(err.to_string()),
            TokenError::Expired | TokenError::Invalid => {
                AppError::Auth("Not Authorized Login Again".to_string())
            }
        }
    }
}

/// Signs an HS256 token for `subject`. Admin tokens use the admin email as subject.
pub fn issue_token(
    subject: &str,
    role: Role,
    email: Option<&str>,
    jwt_secret: &str,
    ttl_hours: i64,
) -> Result<String, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let now = Utc::now();
    let expires_at = Duration::try_hours(ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            TokenError::Signing(format!("token lifetime of {} hours is out of range", ttl_hours))
        })?;

    let claims = JwtClaims {
        sub: subject.to_string(),
        role,
        email: email.map(str::to_string),
        iat: now.timestamp().max(0) as u64,
        exp: expires_at.timestamp().max(0) as u64,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => {
            debug!("Token expired");
            TokenError::Expired
        }
        other => {
            debug!("Token rejected: {:?}", other);
            TokenError::Invalid
        }
    })?;

    let claims = data.claims;
    let user = User {
        id: claims.sub,
        role: claims.role,
        email: claims.email,
        created_at: Utc.timestamp_opt(claims.iat as i64, 0).single(),
    };

    debug!("Token validated successfully for {} {}", user.role, user.id);
    Ok(user)
}
