use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::Database;
use shared_integrations::ImageStore;
use shared_models::address::Address;
use shared_models::patient::{PatientProfile, PatientUpdate};
use shared_utils::form::FormData;
use shared_utils::AppState;

use crate::models::PatientError;

const IMAGE_FOLDER: &str = "patients";

/// Placeholder the booking UI submits when no birth date was chosen.
const DOB_NOT_SELECTED: &str = "Not Selected";

pub struct PatientService {
    db: Database,
    images: Arc<dyn ImageStore>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            images: state.images.clone(),
        }
    }

    pub async fn get_profile(&self, patient_id: Uuid) -> Result<PatientProfile, PatientError> {
        let patient = self
            .db
            .patients
            .get_patient(patient_id)
            .await?
            .ok_or(PatientError::NotFound)?;
        Ok(patient.profile())
    }

    /// Name, phone, address and gender are required; dob and image are optional.
    pub fn parse_update(form: &FormData) -> Result<PatientUpdate, PatientError> {
        let (Some(name), Some(phone), Some(address), Some(gender)) = (
            form.text("name"),
            form.text("phone"),
            form.text("address"),
            form.text("gender"),
        ) else {
            return Err(PatientError::MissingDetails);
        };

        let address = Address::from_json_field(address)
            .map_err(|_| PatientError::ValidationError("Address must be a JSON object".to_string()))?;

        let dob = match form.text("dob") {
            None | Some(DOB_NOT_SELECTED) => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                PatientError::ValidationError("Date of birth must be YYYY-MM-DD".to_string())
            })?),
        };

        Ok(PatientUpdate {
            name: Some(name.to_string()),
            phone: Some(phone.to_string()),
            address: Some(address),
            gender: Some(gender.to_string()),
            dob,
            image: None,
        })
    }

    pub async fn update_profile(
        &self,
        patient_id: Uuid,
        form: FormData,
    ) -> Result<PatientProfile, PatientError> {
        let mut update = Self::parse_update(&form)?;

        if let Some(image) = form.image {
            if !image.is_image() {
                return Err(PatientError::ValidationError("Please upload an image file".to_string()));
            }
            debug!("Uploading profile image for patient {}", patient_id);
            update.image = Some(self.images.upload(IMAGE_FOLDER, image).await?);
        }

        let patient = self
            .db
            .patients
            .update_patient(patient_id, update)
            .await?
            .ok_or(PatientError::NotFound)?;

        info!("Patient {} updated their profile", patient_id);
        Ok(patient.profile())
    }
}
