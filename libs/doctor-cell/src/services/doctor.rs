use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use auth_cell::PasswordService;
use shared_database::Database;
use shared_integrations::{ImageStore, UploadedImage};
use shared_models::address::Address;
use shared_models::doctor::{DoctorProfile, DoctorRecord, DoctorUpdate, PublicDoctor};
use shared_utils::form::FormData;
use shared_utils::AppState;

use crate::models::{DoctorError, NewDoctor, UpdateDoctorProfileRequest};

const IMAGE_FOLDER: &str = "doctors";

pub struct DoctorService {
    db: Database,
    images: Arc<dyn ImageStore>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            images: state.images.clone(),
        }
    }

    /// Reads and validates the admin add-doctor form.
    pub fn parse_new_doctor(form: &FormData) -> Result<NewDoctor, DoctorError> {
        let field = |name: &str| form.text(name).map(str::to_string);

        let (
            Some(name),
            Some(email),
            Some(password),
            Some(speciality),
            Some(degree),
            Some(experience),
            Some(about),
            Some(fees),
            Some(address),
        ) = (
            field("name"),
            field("email"),
            field("password"),
            field("speciality"),
            field("degree"),
            field("experience"),
            field("about"),
            field("fees"),
            field("address"),
        )
        else {
            return Err(DoctorError::MissingDetails);
        };

        let email = email.to_lowercase();
        PasswordService::validate_credentials(&email, &password)?;

        let fees = parse_fees(&fees)?;
        let address = Address::from_json_field(&address)
            .map_err(|_| DoctorError::ValidationError("Address must be a JSON object".to_string()))?;

        Ok(NewDoctor {
            name,
            email,
            password,
            speciality,
            degree,
            experience,
            about,
            fees,
            address,
        })
    }

    async fn upload_image(&self, image: Option<UploadedImage>) -> Result<Option<String>, DoctorError> {
        let Some(image) = image else {
            return Ok(None);
        };
        if !image.is_image() {
            return Err(DoctorError::ValidationError("Please upload an image file".to_string()));
        }
        Ok(Some(self.images.upload(IMAGE_FOLDER, image).await?))
    }

    pub async fn add_doctor(&self, form: FormData) -> Result<DoctorRecord, DoctorError> {
        let new_doctor = Self::parse_new_doctor(&form)?;

        if self
            .db
            .doctors
            .find_doctor_by_email(&new_doctor.email)
            .await?
            .is_some()
        {
            return Err(DoctorError::EmailTaken);
        }

        let password_hash = PasswordService::hash_password(&new_doctor.password)?;
        let image = self.upload_image(form.image).await?;

        let record = DoctorRecord {
            id: Uuid::new_v4(),
            name: new_doctor.name,
            email: new_doctor.email,
            password_hash,
            image,
            speciality: new_doctor.speciality,
            degree: new_doctor.degree,
            experience: new_doctor.experience,
            about: new_doctor.about,
            fees: new_doctor.fees,
            address: new_doctor.address,
            available: true,
            created_at: Utc::now(),
        };

        let doctor = self.db.doctors.insert_doctor(record).await?;
        info!("Added doctor {} ({})", doctor.id, doctor.speciality);
        Ok(doctor)
    }

    /// Patient-facing listing with booked slots attached.
    pub async fn list_public(&self, speciality: Option<&str>) -> Result<Vec<PublicDoctor>, DoctorError> {
        let speciality = speciality.map(str::trim).filter(|s| !s.is_empty());
        let doctors = self.db.doctors.list_doctors().await?;

        let mut listing = Vec::with_capacity(doctors.len());
        for doctor in doctors {
            if let Some(wanted) = speciality {
                if !doctor.speciality.eq_ignore_ascii_case(wanted) {
                    continue;
                }
            }
            let booked = self.db.slots.booked_slots(doctor.id).await?;
            listing.push(doctor.public_view(booked));
        }

        debug!("Listing {} doctors (speciality: {:?})", listing.len(), speciality);
        Ok(listing)
    }

    pub async fn list_all(&self) -> Result<Vec<DoctorProfile>, DoctorError> {
        let doctors = self.db.doctors.list_doctors().await?;
        Ok(doctors.iter().map(DoctorRecord::profile).collect())
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<DoctorRecord, DoctorError> {
        self.db
            .doctors
            .get_doctor(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)
    }

    pub async fn profile(&self, doctor_id: Uuid) -> Result<DoctorProfile, DoctorError> {
        Ok(self.get_doctor(doctor_id).await?.profile())
    }

    pub async fn update_profile(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorProfileRequest,
    ) -> Result<DoctorProfile, DoctorError> {
        if let Some(fees) = request.fees {
            validate_fees(fees)?;
        }

        let update = DoctorUpdate {
            fees: request.fees,
            address: request.address,
            available: request.available,
            image: None,
        };

        let doctor = self
            .db
            .doctors
            .update_doctor(doctor_id, update)
            .await?
            .ok_or(DoctorError::NotFound)?;

        info!("Doctor {} updated their profile", doctor_id);
        Ok(doctor.profile())
    }

    /// Flips the `available` flag and returns the new value.
    pub async fn change_availability(&self, doctor_id: Uuid) -> Result<bool, DoctorError> {
        let doctor = self.get_doctor(doctor_id).await?;
        let update = DoctorUpdate {
            available: Some(!doctor.available),
            ..Default::default()
        };

        let updated = self
            .db
            .doctors
            .update_doctor(doctor_id, update)
            .await?
            .ok_or(DoctorError::NotFound)?;

        info!("Doctor {} availability set to {}", doctor_id, updated.available);
        Ok(updated.available)
    }
}

fn validate_fees(fees: f64) -> Result<f64, DoctorError> {
    if fees.is_finite() && fees > 0.0 {
        Ok(fees)
    } else {
        Err(DoctorError::ValidationError("Fees must be a positive number".to_string()))
    }
}

fn parse_fees(raw: &str) -> Result<f64, DoctorError> {
    let fees = raw
        .parse::<f64>()
        .map_err(|_| DoctorError::ValidationError("Fees must be a positive number".to_string()))?;
    validate_fees(fees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_utils::test_utils::FormFields;

    fn complete_form() -> FormData {
        FormData::default()
            .with_field("name", "Dr. Emily Larson")
            .with_field("email", "Emily@Prescripto.test")
            .with_field("password", "emily-pass")
            .with_field("speciality", "Gynecologist")
            .with_field("degree", "MBBS")
            .with_field("experience", "3 Years")
            .with_field("about", "Women's health")
            .with_field("fees", "60")
            .with_field("address", r#"{"line1":"27th Cross","line2":"Richmond"}"#)
    }

    #[test]
    fn complete_form_parses() {
        let doctor = DoctorService::parse_new_doctor(&complete_form()).unwrap();
        assert_eq!(doctor.email, "emily@prescripto.test");
        assert_eq!(doctor.fees, 60.0);
        assert_eq!(doctor.address.line2, "Richmond");
    }

    #[test]
    fn any_missing_field_is_missing_details() {
        let form = complete_form().with_field("degree", " ");
        assert_matches!(
            DoctorService::parse_new_doctor(&form),
            Err(DoctorError::MissingDetails)
        );
    }

    #[test]
    fn fees_and_address_are_validated() {
        assert_matches!(
            DoctorService::parse_new_doctor(&complete_form().with_field("fees", "-5")),
            Err(DoctorError::ValidationError(_))
        );
        assert_matches!(
            DoctorService::parse_new_doctor(&complete_form().with_field("address", "Richmond")),
            Err(DoctorError::ValidationError(_))
        );
        assert_matches!(
            DoctorService::parse_new_doctor(&complete_form().with_field("password", "short")),
            Err(DoctorError::Credentials(_))
        );
    }
}
