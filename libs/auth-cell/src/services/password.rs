use std::sync::LazyLock;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use regex::Regex;
use tracing::{debug, instrument};

use crate::models::AuthError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

static EMAIL_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$").ok()
});

pub struct PasswordService;

impl PasswordService {
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(password_hash.to_string())
    }

    /// `Ok(false)` on a wrong password; `Err` only when the stored hash is unreadable.
    #[instrument(skip(password, hash))]
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password mismatch");
                Ok(false)
            }
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }

    pub fn validate_email(email: &str) -> bool {
        email.len() <= 254
            && EMAIL_REGEX
                .as_ref()
                .is_some_and(|regex| regex.is_match(email))
    }

    pub fn is_strong_enough(password: &str) -> bool {
        password.chars().count() >= MIN_PASSWORD_LENGTH
    }

    /// Shared checks for any new account: email shape, then password length.
    pub fn validate_credentials(email: &str, password: &str) -> Result<(), AuthError> {
        if !Self::validate_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        if !Self::is_strong_enough(password) {
            return Err(AuthError::WeakPassword);
        }
        Ok(())
    }
}
