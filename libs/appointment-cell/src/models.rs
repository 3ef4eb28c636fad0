use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::DatabaseError;
use shared_models::appointment::{AppointmentFilter, AppointmentRecord};
use shared_models::error::AppError;

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    #[serde(rename = "docId", alias = "doc_id")]
    pub doc_id: Uuid,
    #[serde(rename = "slotDate", alias = "slot_date")]
    pub slot_date: String,
    #[serde(rename = "slotTime", alias = "slot_time")]
    pub slot_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentIdRequest {
    #[serde(rename = "appointmentId", alias = "appointment_id")]
    pub appointment_id: Uuid,
}

// ==============================================================================
// ACTORS AND SCOPES
// ==============================================================================

/// Who is asking for a cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canceller {
    Patient(Uuid),
    Doctor(Uuid),
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentScope {
    Patient(Uuid),
    Doctor(Uuid),
    All,
}

impl AppointmentScope {
    pub fn filter(&self) -> AppointmentFilter {
        match self {
            AppointmentScope::Patient(id) => AppointmentFilter::patient(*id),
            AppointmentScope::Doctor(id) => AppointmentFilter::doctor(*id),
            AppointmentScope::All => AppointmentFilter::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Cancel,
    Complete,
}

/// Outcome of a lifecycle check. `AlreadyApplied` means the flag is already set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Apply,
    AlreadyApplied,
}

// ==============================================================================
// DASHBOARDS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDashboard {
    pub earnings: f64,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<AppointmentRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub doctors: usize,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<AppointmentRecord>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not available")]
    DoctorUnavailable,

    #[error("Slot not available")]
    SlotTaken,

    #[error("Unauthorized action")]
    Unauthorized,

    #[error("Cancelled appointments cannot be completed")]
    AlreadyCancelled,

    #[error("Completed appointments cannot be cancelled")]
    AlreadyCompleted,

    #[error("{0}")]
    ValidationError(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::PatientNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::DoctorUnavailable
            | AppointmentError::SlotTaken
            | AppointmentError::AlreadyCancelled
            | AppointmentError::AlreadyCompleted => AppError::Conflict(err.to_string()),
            AppointmentError::Unauthorized => AppError::Auth(err.to_string()),
            AppointmentError::ValidationError(_) => AppError::ValidationError(err.to_string()),
            AppointmentError::Database(e) => e.into(),
        }
    }
}
