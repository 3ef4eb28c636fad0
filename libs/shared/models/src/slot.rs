use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booked times per date key for one doctor. Derived from reservations.
pub type BookedSlots = BTreeMap<String, BTreeSet<String>>;

/// One bookable unit. Date and time are opaque strings compared for equality only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    pub doctor_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
}

impl SlotKey {
    pub fn new(doctor_id: Uuid, slot_date: impl Into<String>, slot_time: impl Into<String>) -> Self {
        Self {
            doctor_id,
            slot_date: slot_date.into(),
            slot_time: slot_time.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotReservation {
    pub doctor_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
    pub appointment_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl SlotReservation {
    pub fn new(key: SlotKey, appointment_id: Uuid) -> Self {
        Self {
            doctor_id: key.doctor_id,
            slot_date: key.slot_date,
            slot_time: key.slot_time,
            appointment_id,
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.doctor_id, self.slot_date.clone(), self.slot_time.clone())
    }
}

pub fn group_booked_slots<I>(keys: I) -> BookedSlots
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut booked = BookedSlots::new();
    for (date, time) in keys {
        booked.entry(date).or_default().insert(time);
    }
    booked
}
