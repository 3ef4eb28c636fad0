use serde::{Deserialize, Serialize};
use uuid::Uuid;

use auth_cell::AuthError;
use shared_database::DatabaseError;
use shared_integrations::GatewayError;
use shared_models::address::Address;
use shared_models::error::AppError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorListQuery {
    pub speciality: Option<String>,
}

/// Fields a doctor may change on their own record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorProfileRequest {
    pub fees: Option<f64>,
    pub address: Option<Address>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeAvailabilityRequest {
    #[serde(rename = "docId", alias = "doc_id")]
    pub doc_id: Uuid,
}

/// Validated add-doctor form, before hashing and upload.
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub password: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub address: Address,
}

#[derive(Debug, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Missing Details")]
    MissingDetails,

    #[error("Doctor already exists")]
    EmailTaken,

    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    Credentials(#[from] AuthError),

    #[error("Image upload failed: {0}")]
    Storage(#[from] GatewayError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::MissingDetails | DoctorError::ValidationError(_) => {
                AppError::ValidationError(err.to_string())
            }
            DoctorError::EmailTaken | DoctorError::Database(DatabaseError::Conflict(_)) => {
                AppError::Conflict(DoctorError::EmailTaken.to_string())
            }
            DoctorError::Credentials(e) => e.into(),
            DoctorError::Storage(e) => e.into(),
            DoctorError::Database(e) => e.into(),
        }
    }
}
