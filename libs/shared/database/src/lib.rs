pub mod error;
pub mod memory;
pub mod rest;
pub mod store;
pub mod supabase;

use std::sync::Arc;

use tracing::info;

use shared_config::{AppConfig, DatabaseBackend};

pub use error::{DatabaseError, DbResult};
pub use memory::MemoryDatabase;
pub use rest::SupabaseStore;
pub use store::{AppointmentStore, DoctorStore, PatientStore, SlotStore};

/// Handles to every collection, cheap to clone into request handlers.
#[derive(Clone)]
pub struct Database {
    pub doctors: Arc<dyn DoctorStore>,
    pub patients: Arc<dyn PatientStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub slots: Arc<dyn SlotStore>,
}

impl Database {
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryDatabase::default()))
    }

    pub fn from_memory(memory: Arc<MemoryDatabase>) -> Self {
        Self {
            doctors: memory.clone(),
            patients: memory.clone(),
            appointments: memory.clone(),
            slots: memory,
        }
    }

    pub fn supabase(config: &AppConfig) -> DbResult<Self> {
        if config.supabase_url.is_empty() || config.supabase_service_key.is_empty() {
            return Err(DatabaseError::NotConfigured(
                "SUPABASE_URL and SUPABASE_SERVICE_KEY are required".to_string(),
            ));
        }

        let store = Arc::new(SupabaseStore::new(config));
        Ok(Self {
            doctors: store.clone(),
            patients: store.clone(),
            appointments: store.clone(),
            slots: store,
        })
    }

    pub fn from_config(config: &AppConfig) -> DbResult<Self> {
        match config.database_backend {
            DatabaseBackend::Memory => {
                info!("Using in-memory database");
                Ok(Self::in_memory())
            }
            DatabaseBackend::Supabase => {
                info!("Using Supabase database at {}", config.supabase_url);
                Self::supabase(config)
            }
        }
    }
}
