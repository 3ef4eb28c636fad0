use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::doctor::{DoctorRecord, DoctorSnapshot};
use crate::patient::{PatientRecord, PatientSnapshot};
use crate::slot::SlotKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doc_id: Uuid,
    pub user_data: PatientSnapshot,
    pub doc_data: DoctorSnapshot,
    pub slot_date: String,
    pub slot_time: String,
    pub amount: f64,
    pub cancelled: bool,
    pub payment: bool,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl AppointmentRecord {
    /// Builds a fresh booking. The fee is copied here and never recomputed.
    pub fn book(
        id: Uuid,
        patient: &PatientRecord,
        doctor: &DoctorRecord,
        slot_date: String,
        slot_time: String,
    ) -> Self {
        Self {
            id,
            user_id: patient.id,
            doc_id: doctor.id,
            user_data: patient.snapshot(),
            doc_data: doctor.snapshot(),
            slot_date,
            slot_time,
            amount: doctor.fees,
            cancelled: false,
            payment: false,
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn slot(&self) -> SlotKey {
        SlotKey::new(self.doc_id, self.slot_date.clone(), self.slot_time.clone())
    }

    pub fn counts_towards_earnings(&self) -> bool {
        self.is_completed || self.payment
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl AppointmentUpdate {
    pub fn cancelled() -> Self {
        Self {
            cancelled: Some(true),
            ..Default::default()
        }
    }

    pub fn completed() -> Self {
        Self {
            is_completed: Some(true),
            ..Default::default()
        }
    }

    pub fn paid() -> Self {
        Self {
            payment: Some(true),
            ..Default::default()
        }
    }

    pub fn apply(self, appointment: &mut AppointmentRecord) {
        if let Some(cancelled) = self.cancelled {
            appointment.cancelled = cancelled;
        }
        if let Some(payment) = self.payment {
            appointment.payment = payment;
        }
        if let Some(is_completed) = self.is_completed {
            appointment.is_completed = is_completed;
        }
    }
}

/// Store-level filter. Empty filter means every appointment; `limit` keeps only
/// the newest rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub user_id: Option<Uuid>,
    pub doc_id: Option<Uuid>,
    pub limit: Option<usize>,
}

impl AppointmentFilter {
    pub fn patient(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn doctor(doc_id: Uuid) -> Self {
        Self {
            doc_id: Some(doc_id),
            ..Self::default()
        }
    }

    pub fn newest(self, limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    pub fn matches(&self, appointment: &AppointmentRecord) -> bool {
        self.user_id.map_or(true, |id| appointment.user_id == id)
            && self.doc_id.map_or(true, |id| appointment.doc_id == id)
    }
}
