use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::Address;

pub const DEFAULT_PHONE: &str = "0000000000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: Option<String>,
    pub phone: String,
    pub address: Address,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl PatientRecord {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            image: None,
            phone: DEFAULT_PHONE.to_string(),
            address: Address::default(),
            gender: None,
            dob: None,
            created_at: Utc::now(),
        }
    }

    pub fn snapshot(&self) -> PatientSnapshot {
        PatientSnapshot {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            image: self.image.clone(),
            address: self.address.clone(),
            gender: self.gender.clone(),
            dob: self.dob,
        }
    }

    pub fn profile(&self) -> PatientProfile {
        PatientProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            image: self.image.clone(),
            address: self.address.clone(),
            gender: self.gender.clone(),
            dob: self.dob,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl PatientUpdate {
    pub fn apply(self, patient: &mut PatientRecord) {
        if let Some(name) = self.name {
            patient.name = name;
        }
        if let Some(phone) = self.phone {
            patient.phone = phone;
        }
        if let Some(address) = self.address {
            patient.address = address;
        }
        if let Some(gender) = self.gender {
            patient.gender = Some(gender);
        }
        if let Some(dob) = self.dob {
            patient.dob = Some(dob);
        }
        if let Some(image) = self.image {
            patient.image = Some(image);
        }
    }
}

/// Patient data frozen into an appointment at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub image: Option<String>,
    pub address: Address,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub image: Option<String>,
    pub address: Address,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
