use std::sync::Arc;

use axum::extract::FromRef;

use shared_config::AppConfig;
use shared_database::{Database, DbResult};
use shared_integrations::{ImageStore, PaymentGateway, RazorpayClient, SupabaseStorage};

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub payments: Arc<dyn PaymentGateway>,
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: Database,
        payments: Arc<dyn PaymentGateway>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            db,
            payments,
            images,
        }
    }

    pub fn from_config(config: AppConfig) -> DbResult<Self> {
        let db = Database::from_config(&config)?;
        let payments = Arc::new(RazorpayClient::new(&config));
        let images = Arc::new(SupabaseStorage::new(&config));
        Ok(Self::new(config, db, payments, images))
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
