use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 168;
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;
pub const DEFAULT_RAZORPAY_BASE_URL: &str = "https://api.razorpay.com/v1";

/// Where records are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Memory,
    Supabase,
}

impl FromStr for DatabaseBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(DatabaseBackend::Memory),
            "supabase" => Ok(DatabaseBackend::Supabase),
            other => Err(format!("Unknown database backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub admin_email: String,
    pub admin_password: String,
    pub database_backend: DatabaseBackend,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub storage_bucket: String,
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub razorpay_base_url: String,
    pub currency: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            jwt_secret: String::new(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            admin_email: String::new(),
            admin_password: String::new(),
            database_backend: DatabaseBackend::Memory,
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            storage_bucket: "images".to_string(),
            razorpay_key_id: String::new(),
            razorpay_key_secret: String::new(),
            razorpay_base_url: DEFAULT_RAZORPAY_BASE_URL.to_string(),
            currency: "INR".to_string(),
        }
    }
}

fn required(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", name);
        String::new()
    })
}

fn with_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        warn!("{} not set, using default", name);
        default.to_string()
    })
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let supabase_url = required("SUPABASE_URL");

        let database_backend = match env::var("DATABASE_BACKEND") {
            Ok(value) => value.parse().unwrap_or_else(|err: String| {
                warn!("{}, falling back to in-memory store", err);
                DatabaseBackend::Memory
            }),
            Err(_) if supabase_url.is_empty() => {
                warn!("DATABASE_BACKEND not set and no SUPABASE_URL, using in-memory store");
                DatabaseBackend::Memory
            }
            Err(_) => DatabaseBackend::Supabase,
        };

        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.port);

        let token_ttl_hours = token_ttl_from(env::var("TOKEN_TTL_HOURS").ok().as_deref());

        let config = Self {
            port,
            jwt_secret: required("JWT_SECRET"),
            token_ttl_hours,
            admin_email: required("ADMIN_EMAIL"),
            admin_password: required("ADMIN_PASSWORD"),
            database_backend,
            supabase_url,
            supabase_service_key: required("SUPABASE_SERVICE_KEY"),
            storage_bucket: with_default("SUPABASE_STORAGE_BUCKET", &defaults.storage_bucket),
            razorpay_key_id: required("RAZORPAY_KEY_ID"),
            razorpay_key_secret: required("RAZORPAY_KEY_SECRET"),
            razorpay_base_url: with_default("RAZORPAY_BASE_URL", DEFAULT_RAZORPAY_BASE_URL),
            currency: with_default("CURRENCY", &defaults.currency),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        let store_ready = match self.database_backend {
            DatabaseBackend::Memory => true,
            DatabaseBackend::Supabase => {
                !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
            }
        };

        store_ready && !self.jwt_secret.is_empty()
    }

    pub fn is_admin_configured(&self) -> bool {
        !self.admin_email.is_empty() && !self.admin_password.is_empty()
    }

    pub fn is_payment_configured(&self) -> bool {
        !self.razorpay_key_id.is_empty()
            && !self.razorpay_key_secret.is_empty()
            && !self.razorpay_base_url.is_empty()
    }

    pub fn is_storage_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_key.is_empty()
            && !self.storage_bucket.is_empty()
    }
}

/// Token lifetime in hours, limited to `1..=MAX_TOKEN_TTL_HOURS`.
fn token_ttl_from(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return DEFAULT_TOKEN_TTL_HOURS;
    };
    match raw.trim().parse::<i64>() {
        Ok(hours) if (1..=MAX_TOKEN_TTL_HOURS).contains(&hours) => hours,
        _ => {
            warn!(
                "TOKEN_TTL_HOURS={} is not between 1 and {}, using {}",
                raw, MAX_TOKEN_TTL_HOURS, DEFAULT_TOKEN_TTL_HOURS
            );
            DEFAULT_TOKEN_TTL_HOURS
        }
    }
}
