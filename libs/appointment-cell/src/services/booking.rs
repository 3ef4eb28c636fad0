use tracing::{debug, error, info};
use uuid::Uuid;

use shared_database::Database;
use shared_models::appointment::{AppointmentRecord, AppointmentUpdate};

use crate::models::{
    AppointmentAction, AppointmentError, AppointmentScope, BookAppointmentRequest, Canceller,
    Transition,
};
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::slots::SlotService;

pub struct AppointmentBookingService {
    db: Database,
    slots: SlotService,
}

impl AppointmentBookingService {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            slots: SlotService::new(db),
        }
    }

    /// Book a slot for a patient. The fee in force now becomes the appointment amount.
    pub async fn book(
        &self,
        patient_id: Uuid,
        request: BookAppointmentRequest,
    ) -> Result<AppointmentRecord, AppointmentError> {
        let slot_date = request.slot_date.trim();
        let slot_time = request.slot_time.trim();
        if slot_date.is_empty() || slot_time.is_empty() {
            return Err(AppointmentError::ValidationError("Missing Details".to_string()));
        }

        info!(
            "Booking {} {} with doctor {} for patient {}",
            slot_date, slot_time, request.doc_id, patient_id
        );

        let doctor = self
            .db
            .doctors
            .get_doctor(request.doc_id)
            .await?
            .ok_or(AppointmentError::DoctorNotFound)?;

        let patient = self
            .db
            .patients
            .get_patient(patient_id)
            .await?
            .ok_or(AppointmentError::PatientNotFound)?;

        let appointment_id = Uuid::new_v4();
        let key = self
            .slots
            .reserve(&doctor, slot_date, slot_time, appointment_id)
            .await?;

        let record = AppointmentRecord::book(
            appointment_id,
            &patient,
            &doctor,
            slot_date.to_string(),
            slot_time.to_string(),
        );

        match self.db.appointments.insert_appointment(record).await {
            Ok(appointment) => {
                info!("Appointment {} booked with doctor {}", appointment.id, doctor.id);
                Ok(appointment)
            }
            Err(insert_err) => {
                // Hand the slot back so a failed insert does not leave it orphaned.
                if let Err(release_err) = self.slots.release_held_by(&key, appointment_id).await {
                    error!(
                        "Failed to release slot after insert failure for {}: {}",
                        appointment_id, release_err
                    );
                }
                Err(insert_err.into())
            }
        }
    }

    pub async fn get(&self, appointment_id: Uuid) -> Result<AppointmentRecord, AppointmentError> {
        self.db
            .appointments
            .get_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Marks the appointment cancelled and frees its slot. Safe to repeat; only the slot
    /// this appointment holds is ever released.
    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        canceller: Canceller,
    ) -> Result<AppointmentRecord, AppointmentError> {
        debug!("Cancelling appointment {} on behalf of {:?}", appointment_id, canceller);

        let appointment = self.get(appointment_id).await?;
        AppointmentLifecycleService::authorize_cancel(&appointment, canceller)?;

        let appointment = match AppointmentLifecycleService::validate_transition(
            &appointment,
            AppointmentAction::Cancel,
        )? {
            Transition::Apply => self
                .db
                .appointments
                .update_appointment(appointment_id, AppointmentUpdate::cancelled())
                .await?
                .ok_or(AppointmentError::NotFound)?,
            Transition::AlreadyApplied => appointment,
        };

        self.slots
            .release_held_by(&appointment.slot(), appointment.id)
            .await?;

        info!("Appointment {} cancelled", appointment_id);
        Ok(appointment)
    }

    /// Completion keeps the slot reserved.
    pub async fn complete(
        &self,
        appointment_id: Uuid,
        doctor_id: Uuid,
    ) -> Result<AppointmentRecord, AppointmentError> {
        let appointment = self.get(appointment_id).await?;
        AppointmentLifecycleService::authorize_complete(&appointment, doctor_id)?;

        match AppointmentLifecycleService::validate_transition(
            &appointment,
            AppointmentAction::Complete,
        )? {
            Transition::Apply => {
                let updated = self
                    .db
                    .appointments
                    .update_appointment(appointment_id, AppointmentUpdate::completed())
                    .await?
                    .ok_or(AppointmentError::NotFound)?;
                info!("Appointment {} completed by doctor {}", appointment_id, doctor_id);
                Ok(updated)
            }
            Transition::AlreadyApplied => Ok(appointment),
        }
    }

    /// Most recent first.
    pub async fn list_for(
        &self,
        scope: AppointmentScope,
    ) -> Result<Vec<AppointmentRecord>, AppointmentError> {
        Ok(self.db.appointments.list_appointments(scope.filter()).await?)
    }
}
