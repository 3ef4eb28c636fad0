use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use shared_models::appointment::{AppointmentFilter, AppointmentRecord, AppointmentUpdate};
use shared_models::doctor::{DoctorRecord, DoctorUpdate};
use shared_models::patient::{PatientRecord, PatientUpdate};
use shared_models::slot::{group_booked_slots, BookedSlots, SlotKey, SlotReservation};

use crate::error::{DatabaseError, DbResult};
use crate::store::{AppointmentStore, DoctorStore, PatientStore, SlotStore};

/// Process-local store used in development mode and tests.
#[derive(Default)]
pub struct MemoryDatabase {
    doctors: RwLock<HashMap<Uuid, DoctorRecord>>,
    patients: RwLock<HashMap<Uuid, PatientRecord>>,
    appointments: RwLock<HashMap<Uuid, AppointmentRecord>>,
    reservations: Mutex<HashMap<SlotKey, SlotReservation>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DoctorStore for MemoryDatabase {
    async fn insert_doctor(&self, doctor: DoctorRecord) -> DbResult<DoctorRecord> {
        let mut doctors = self.doctors.write().await;

        if doctors.values().any(|existing| existing.email == doctor.email) {
            return Err(DatabaseError::Conflict(format!(
                "Doctor with email {} already exists",
                doctor.email
            )));
        }

        doctors.insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    async fn get_doctor(&self, id: Uuid) -> DbResult<Option<DoctorRecord>> {
        Ok(self.doctors.read().await.get(&id).cloned())
    }

    async fn find_doctor_by_email(&self, email: &str) -> DbResult<Option<DoctorRecord>> {
        Ok(self
            .doctors
            .read()
            .await
            .values()
            .find(|doctor| doctor.email == email)
            .cloned())
    }

    async fn list_doctors(&self) -> DbResult<Vec<DoctorRecord>> {
        let mut doctors: Vec<DoctorRecord> = self.doctors.read().await.values().cloned().collect();
        doctors.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(doctors)
    }

    async fn update_doctor(&self, id: Uuid, update: DoctorUpdate) -> DbResult<Option<DoctorRecord>> {
        let mut doctors = self.doctors.write().await;
        Ok(doctors.get_mut(&id).map(|doctor| {
            update.apply(doctor);
            doctor.clone()
        }))
    }

    async fn count_doctors(&self) -> DbResult<usize> {
        Ok(self.doctors.read().await.len())
    }
}

#[async_trait]
impl PatientStore for MemoryDatabase {
    async fn insert_patient(&self, patient: PatientRecord) -> DbResult<PatientRecord> {
        let mut patients = self.patients.write().await;

        if patients.values().any(|existing| existing.email == patient.email) {
            return Err(DatabaseError::Conflict(format!(
                "Patient with email {} already exists",
                patient.email
            )));
        }

        patients.insert(patient.id, patient.clone());
        Ok(patient)
    }

    async fn get_patient(&self, id: Uuid) -> DbResult<Option<PatientRecord>> {
        Ok(self.patients.read().await.get(&id).cloned())
    }

    async fn find_patient_by_email(&self, email: &str) -> DbResult<Option<PatientRecord>> {
        Ok(self
            .patients
            .read()
            .await
            .values()
            .find(|patient| patient.email == email)
            .cloned())
    }

    async fn update_patient(&self, id: Uuid, update: PatientUpdate) -> DbResult<Option<PatientRecord>> {
        let mut patients = self.patients.write().await;
        Ok(patients.get_mut(&id).map(|patient| {
            update.apply(patient);
            patient.clone()
        }))
    }

    async fn count_patients(&self) -> DbResult<usize> {
        Ok(self.patients.read().await.len())
    }
}

#[async_trait]
impl AppointmentStore for MemoryDatabase {
    async fn insert_appointment(&self, appointment: AppointmentRecord) -> DbResult<AppointmentRecord> {
        let mut appointments = self.appointments.write().await;

        if appointments.contains_key(&appointment.id) {
            return Err(DatabaseError::Conflict(format!(
                "Appointment {} already exists",
                appointment.id
            )));
        }

        appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn get_appointment(&self, id: Uuid) -> DbResult<Option<AppointmentRecord>> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn list_appointments(&self, filter: AppointmentFilter) -> DbResult<Vec<AppointmentRecord>> {
        let mut appointments: Vec<AppointmentRecord> = self
            .appointments
            .read()
            .await
            .values()
            .filter(|appointment| filter.matches(appointment))
            .cloned()
            .collect();
        appointments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        if let Some(limit) = filter.limit {
            appointments.truncate(limit);
        }
        Ok(appointments)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        update: AppointmentUpdate,
    ) -> DbResult<Option<AppointmentRecord>> {
        let mut appointments = self.appointments.write().await;
        Ok(appointments.get_mut(&id).map(|appointment| {
            update.apply(appointment);
            appointment.clone()
        }))
    }

    async fn count_appointments(&self) -> DbResult<usize> {
        Ok(self.appointments.read().await.len())
    }
}

#[async_trait]
impl SlotStore for MemoryDatabase {
    async fn reserve_slot(&self, reservation: SlotReservation) -> DbResult<()> {
        let key = reservation.key();
        let mut reservations = self.reservations.lock().await;

        if let Some(existing) = reservations.get(&key) {
            debug!(
                "Slot {} {} for doctor {} already held by {}",
                key.slot_date, key.slot_time, key.doctor_id, existing.appointment_id
            );
            return Err(DatabaseError::Conflict(format!(
                "Slot {} {} already booked",
                key.slot_date, key.slot_time
            )));
        }

        reservations.insert(key, reservation);
        Ok(())
    }

    async fn release_slot(&self, key: &SlotKey, holder: Option<Uuid>) -> DbResult<bool> {
        let mut reservations = self.reservations.lock().await;

        let held_by_holder = match (reservations.get(key), holder) {
            (None, _) => return Ok(false),
            (Some(_), None) => true,
            (Some(existing), Some(holder)) => existing.appointment_id == holder,
        };

        if !held_by_holder {
            return Ok(false);
        }

        Ok(reservations.remove(key).is_some())
    }

    async fn slot_holder(&self, key: &SlotKey) -> DbResult<Option<Uuid>> {
        Ok(self
            .reservations
            .lock()
            .await
            .get(key)
            .map(|reservation| reservation.appointment_id))
    }

    async fn booked_slots(&self, doctor_id: Uuid) -> DbResult<BookedSlots> {
        let reservations = self.reservations.lock().await;
        Ok(group_booked_slots(
            reservations
                .keys()
                .filter(|key| key.doctor_id == doctor_id)
                .map(|key| (key.slot_date.clone(), key.slot_time.clone())),
        ))
    }
}
