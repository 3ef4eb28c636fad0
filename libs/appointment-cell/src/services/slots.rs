use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use shared_database::{Database, DatabaseError, SlotStore};
use shared_models::doctor::DoctorRecord;
use shared_models::slot::{SlotKey, SlotReservation};

use crate::models::AppointmentError;

/// Per-doctor slot bookkeeping on top of the reservation table.
pub struct SlotService {
    slots: Arc<dyn SlotStore>,
}

impl SlotService {
    pub fn new(db: &Database) -> Self {
        Self {
            slots: db.slots.clone(),
        }
    }

    pub async fn is_available(&self, key: &SlotKey) -> Result<bool, AppointmentError> {
        Ok(self.slots.slot_holder(key).await?.is_none())
    }

    /// Holds `date`/`time` for `holder`. The store insert is the only check that counts,
    /// so two racing callers cannot both succeed.
    pub async fn reserve(
        &self,
        doctor: &DoctorRecord,
        slot_date: &str,
        slot_time: &str,
        holder: Uuid,
    ) -> Result<SlotKey, AppointmentError> {
        if !doctor.available {
            return Err(AppointmentError::DoctorUnavailable);
        }

        let key = SlotKey::new(doctor.id, slot_date, slot_time);
        match self
            .slots
            .reserve_slot(SlotReservation::new(key.clone(), holder))
            .await
        {
            Ok(()) => {
                debug!("Reserved {} {} for doctor {}", slot_date, slot_time, doctor.id);
                Ok(key)
            }
            Err(DatabaseError::Conflict(_)) => {
                debug!("Slot {} {} already held for doctor {}", slot_date, slot_time, doctor.id);
                Err(AppointmentError::SlotTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Frees the slot only while `holder` still owns it.
    pub async fn release_held_by(&self, key: &SlotKey, holder: Uuid) -> Result<bool, AppointmentError> {
        let released = self.slots.release_slot(key, Some(holder)).await?;
        if !released {
            warn!(
                "Slot {} {} for doctor {} was not held by {}",
                key.slot_date, key.slot_time, key.doctor_id, holder
            );
        }
        Ok(released)
    }
}
