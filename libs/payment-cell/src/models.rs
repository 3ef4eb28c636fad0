use serde::Deserialize;
use uuid::Uuid;

use shared_database::DatabaseError;
use shared_integrations::GatewayError;
use shared_models::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    #[serde(rename = "appointmentId", alias = "appointment_id")]
    pub appointment_id: Uuid,
}

/// Checkout callback. Payment id and signature are only present when the
/// client forwards them; the order status is checked either way.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Unauthorized action")]
    Unauthorized,

    #[error("Appointment Cancelled or not found")]
    Cancelled,

    #[error("Invalid appointment amount")]
    InvalidAmount,

    #[error("Invalid payment signature")]
    InvalidSignature,

    #[error("Payment Failed")]
    NotPaid,

    #[error("Order has no appointment receipt")]
    MissingReceipt,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotFound => AppError::NotFound(err.to_string()),
            PaymentError::Unauthorized => AppError::Auth(err.to_string()),
            PaymentError::Cancelled => AppError::Conflict(err.to_string()),
            PaymentError::InvalidAmount
            | PaymentError::InvalidSignature
            | PaymentError::NotPaid
            | PaymentError::MissingReceipt => AppError::ValidationError(err.to_string()),
            PaymentError::Gateway(e) => e.into(),
            PaymentError::Database(e) => e.into(),
        }
    }
}
