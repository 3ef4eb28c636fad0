use std::sync::Arc;

use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::Database;
use shared_models::auth::Role;
use shared_models::patient::PatientRecord;
use shared_utils::jwt::issue_token;
use shared_utils::AppState;

use crate::models::{AuthError, LoginRequest, RegisterRequest};
use crate::services::password::PasswordService;

/// Verifies email/password pairs and hands out role-scoped bearer tokens.
pub struct CredentialService {
    config: Arc<AppConfig>,
    db: Database,
}

impl CredentialService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            db: state.db.clone(),
        }
    }

    fn issue(&self, subject: &str, role: Role, email: &str) -> Result<String, AuthError> {
        Ok(issue_token(
            subject,
            role,
            Some(email),
            &self.config.jwt_secret,
            self.config.token_ttl_hours,
        )?)
    }

    pub async fn register_patient(&self, request: RegisterRequest) -> Result<String, AuthError> {
        let name = request.name.trim();
        let email = request.email.trim().to_lowercase();

        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingDetails);
        }

        PasswordService::validate_credentials(&email, &request.password)?;

        if self.db.patients.find_patient_by_email(&email).await?.is_some() {
            debug!("Registration rejected, {} already registered", email);
            return Err(AuthError::EmailTaken);
        }

        let password_hash = PasswordService::hash_password(&request.password)?;
        let patient = self
            .db
            .patients
            .insert_patient(PatientRecord::new(name.to_string(), email, password_hash))
            .await?;

        info!("Registered patient {}", patient.id);
        self.issue(&patient.id.to_string(), Role::Patient, &patient.email)
    }

    pub async fn login_patient(&self, request: LoginRequest) -> Result<String, AuthError> {
        let email = request.email.trim().to_lowercase();
        let patient = self
            .db
            .patients
            .find_patient_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !PasswordService::verify_password(&request.password, &patient.password_hash)? {
            warn!("Failed patient login for {}", patient.id);
            return Err(AuthError::Mismatch);
        }

        self.issue(&patient.id.to_string(), Role::Patient, &patient.email)
    }

    pub async fn login_doctor(&self, request: LoginRequest) -> Result<String, AuthError> {
        let email = request.email.trim().to_lowercase();
        let doctor = self
            .db
            .doctors
            .find_doctor_by_email(&email)
            .await?
            .ok_or(AuthError::Mismatch)?;

        if !PasswordService::verify_password(&request.password, &doctor.password_hash)? {
            warn!("Failed doctor login for {}", doctor.id);
            return Err(AuthError::Mismatch);
        }

        self.issue(&doctor.id.to_string(), Role::Doctor, &doctor.email)
    }

    /// Exact match against the configured pair. Stored records are never consulted.
    pub fn login_admin(&self, request: LoginRequest) -> Result<String, AuthError> {
        if !self.config.is_admin_configured() {
            warn!("Admin login attempted but admin credentials are not configured");
            return Err(AuthError::Mismatch);
        }

        if request.email != self.config.admin_email || request.password != self.config.admin_password {
            warn!("Failed admin login");
            return Err(AuthError::Mismatch);
        }

        self.issue(&self.config.admin_email, Role::Admin, &self.config.admin_email)
    }
}
