use async_trait::async_trait;
use uuid::Uuid;

use shared_models::appointment::{AppointmentFilter, AppointmentRecord, AppointmentUpdate};
use shared_models::doctor::{DoctorRecord, DoctorUpdate};
use shared_models::patient::{PatientRecord, PatientUpdate};
use shared_models::slot::{BookedSlots, SlotKey, SlotReservation};

use crate::error::DbResult;

#[async_trait]
pub trait DoctorStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_doctor(&self, doctor: DoctorRecord) -> DbResult<DoctorRecord>;
    async fn get_doctor(&self, id: Uuid) -> DbResult<Option<DoctorRecord>>;
    async fn find_doctor_by_email(&self, email: &str) -> DbResult<Option<DoctorRecord>>;
    /// Oldest first.
    async fn list_doctors(&self) -> DbResult<Vec<DoctorRecord>>;
    async fn update_doctor(&self, id: Uuid, update: DoctorUpdate) -> DbResult<Option<DoctorRecord>>;
    async fn count_doctors(&self) -> DbResult<usize>;
}

#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert_patient(&self, patient: PatientRecord) -> DbResult<PatientRecord>;
    async fn get_patient(&self, id: Uuid) -> DbResult<Option<PatientRecord>>;
    async fn find_patient_by_email(&self, email: &str) -> DbResult<Option<PatientRecord>>;
    async fn update_patient(&self, id: Uuid, update: PatientUpdate) -> DbResult<Option<PatientRecord>>;
    async fn count_patients(&self) -> DbResult<usize>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert_appointment(&self, appointment: AppointmentRecord) -> DbResult<AppointmentRecord>;
    async fn get_appointment(&self, id: Uuid) -> DbResult<Option<AppointmentRecord>>;
    /// Newest first, ties broken by id. Returns every match unless `filter.limit` is set.
    async fn list_appointments(&self, filter: AppointmentFilter) -> DbResult<Vec<AppointmentRecord>>;
    async fn update_appointment(
        &self,
        id: Uuid,
        update: AppointmentUpdate,
    ) -> DbResult<Option<AppointmentRecord>>;
    /// Exact total, independent of any page size the backend applies to listings.
    async fn count_appointments(&self) -> DbResult<usize>;
}

/// Reservations are unique per (doctor, date, time); the insert is the availability check.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Fails with `Conflict` when the slot is already held.
    async fn reserve_slot(&self, reservation: SlotReservation) -> DbResult<()>;
    /// Returns whether a reservation was removed. With `holder`, only that appointment's
    /// reservation is removed.
    async fn release_slot(&self, key: &SlotKey, holder: Option<Uuid>) -> DbResult<bool>;
    async fn slot_holder(&self, key: &SlotKey) -> DbResult<Option<Uuid>>;
    async fn booked_slots(&self, doctor_id: Uuid) -> DbResult<BookedSlots>;
}
