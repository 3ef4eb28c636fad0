use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Upstream API error: {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid upstream response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}
