use shared_database::DatabaseError;
use shared_integrations::GatewayError;
use shared_models::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Data Missing")]
    MissingDetails,

    #[error("{0}")]
    ValidationError(String),

    #[error("Image upload failed: {0}")]
    Storage(#[from] GatewayError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::MissingDetails | PatientError::ValidationError(_) => {
                AppError::ValidationError(err.to_string())
            }
            PatientError::Storage(e) => e.into(),
            PatientError::Database(e) => e.into(),
        }
    }
}
