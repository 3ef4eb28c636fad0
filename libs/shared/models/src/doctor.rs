use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::Address;
use crate::slot::BookedSlots;

/// Stored doctor document. Never serialized to clients directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: Option<String>,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub address: Address,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl DoctorRecord {
    pub fn snapshot(&self) -> DoctorSnapshot {
        DoctorSnapshot {
            name: self.name.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            fees: self.fees,
            address: self.address.clone(),
        }
    }

    /// Listing shape for patients: no email, no password hash.
    pub fn public_view(&self, slots_booked: BookedSlots) -> PublicDoctor {
        PublicDoctor {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            fees: self.fees,
            address: self.address.clone(),
            available: self.available,
            slots_booked,
            created_at: self.created_at,
        }
    }

    pub fn profile(&self) -> DoctorProfile {
        DoctorProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            speciality: self.speciality.clone(),
            degree: self.degree.clone(),
            experience: self.experience.clone(),
            about: self.about.clone(),
            fees: self.fees,
            address: self.address.clone(),
            available: self.available,
            created_at: self.created_at,
        }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl DoctorUpdate {
    pub fn is_empty(&self) -> bool {
        self.fees.is_none() && self.address.is_none() && self.available.is_none() && self.image.is_none()
    }

    pub fn apply(self, doctor: &mut DoctorRecord) {
        if let Some(fees) = self.fees {
            doctor.fees = fees;
        }
        if let Some(address) = self.address {
            doctor.address = address;
        }
        if let Some(available) = self.available {
            doctor.available = available;
        }
        if let Some(image) = self.image {
            doctor.image = Some(image);
        }
    }
}

/// Doctor data frozen into an appointment at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSnapshot {
    pub name: String,
    pub image: Option<String>,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicDoctor {
    pub id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub address: Address,
    pub available: bool,
    pub slots_booked: BookedSlots,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub fees: f64,
    pub address: Address,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor() -> DoctorRecord {
        DoctorRecord {
            id: Uuid::new_v4(),
            name: "Dr. Richard James".to_string(),
            email: "richard@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            image: None,
            speciality: "General physician".to_string(),
            degree: "MBBS".to_string(),
            experience: "4 Years".to_string(),
            about: "Primary care".to_string(),
            fees: 50.0,
            address: Address::new("17th Cross, Richmond", "Circle, Ring Road, London"),
            available: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn public_view_hides_credentials() {
        let value = serde_json::to_value(doctor().public_view(BookedSlots::new())).unwrap();
        assert!(value.get("email").is_none());
        assert!(value.get("password_hash").is_none());
        assert!(value.get("slots_booked").is_some());
    }

    #[test]
    fn update_only_touches_given_fields() {
        let mut record = doctor();
        DoctorUpdate {
            fees: Some(80.0),
            available: Some(false),
            ..Default::default()
        }
        .apply(&mut record);

        assert_eq!(record.fees, 80.0);
        assert!(!record.available);
        assert_eq!(record.address.line1, "17th Cross, Richmond");
    }

    #[test]
    fn empty_update_serializes_to_empty_object() {
        let value = serde_json::to_value(DoctorUpdate::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
