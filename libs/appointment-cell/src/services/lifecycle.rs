use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::appointment::AppointmentRecord;

use crate::models::{AppointmentAction, AppointmentError, Canceller, Transition};

/// Rules for the two one-way flags on an appointment.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    /// Cancelled and completed are both terminal and mutually exclusive. Repeating the
    /// action that produced the current state is allowed.
    pub fn validate_transition(
        appointment: &AppointmentRecord,
        action: AppointmentAction,
    ) -> Result<Transition, AppointmentError> {
        debug!("Validating {:?} for appointment {}", action, appointment.id);

        match action {
            AppointmentAction::Cancel if appointment.is_completed => {
                warn!("Refusing to cancel completed appointment {}", appointment.id);
                Err(AppointmentError::AlreadyCompleted)
            }
            AppointmentAction::Cancel if appointment.cancelled => Ok(Transition::AlreadyApplied),
            AppointmentAction::Complete if appointment.cancelled => {
                warn!("Refusing to complete cancelled appointment {}", appointment.id);
                Err(AppointmentError::AlreadyCancelled)
            }
            AppointmentAction::Complete if appointment.is_completed => Ok(Transition::AlreadyApplied),
            _ => Ok(Transition::Apply),
        }
    }

    /// Patients may cancel their own bookings, doctors their own schedule, admins anything.
    pub fn authorize_cancel(
        appointment: &AppointmentRecord,
        canceller: Canceller,
    ) -> Result<(), AppointmentError> {
        let allowed = match canceller {
            Canceller::Patient(id) => appointment.user_id == id,
            Canceller::Doctor(id) => appointment.doc_id == id,
            Canceller::Admin => true,
        };

        if !allowed {
            warn!("{:?} may not cancel appointment {}", canceller, appointment.id);
            return Err(AppointmentError::Unauthorized);
        }
        Ok(())
    }

    pub fn authorize_complete(
        appointment: &AppointmentRecord,
        doctor_id: Uuid,
    ) -> Result<(), AppointmentError> {
        if appointment.doc_id != doctor_id {
            warn!("Doctor {} may not complete appointment {}", doctor_id, appointment.id);
            return Err(AppointmentError::Unauthorized);
        }
        Ok(())
    }
}
