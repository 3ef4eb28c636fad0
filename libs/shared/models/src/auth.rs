use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: Role,
    pub email: Option<String>,
    pub iat: u64,
    pub exp: u64,
}

/// Identity resolved from a bearer token by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub role: Role,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role != role {
            return Err(AppError::Auth("Not Authorized Login Again".to_string()));
        }
        Ok(())
    }

    /// Record id of a patient or doctor identity. Admin identities are not records.
    pub fn record_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.id)
            .map_err(|_| AppError::Auth("Not Authorized Login Again".to_string()))
    }

    /// Checks the role claim and returns the record id in one go.
    pub fn require_record(&self, role: Role) -> Result<Uuid, AppError> {
        self.require_role(role)?;
        self.record_id()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub success: bool,
    pub valid: bool,
    pub user_id: String,
    pub email: Option<String>,
    pub role: Role,
}
