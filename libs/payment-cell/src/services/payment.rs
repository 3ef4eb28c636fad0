use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use shared_database::Database;
use shared_integrations::{CreateOrderRequest, GatewayOrder, PaymentGateway};
use shared_models::appointment::{AppointmentRecord, AppointmentUpdate};
use shared_utils::AppState;

use crate::models::{PaymentError, VerifyPaymentRequest};

/// Bridges appointments to gateway orders. The gateway owns payment state;
/// the only local effect is flipping `payment` once an order reports paid.
pub struct PaymentService {
    db: Database,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl PaymentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            gateway: state.payments.clone(),
            currency: state.config.currency.clone(),
        }
    }

    pub async fn create_order(
        &self,
        appointment_id: Uuid,
        patient_id: Uuid,
    ) -> Result<GatewayOrder, PaymentError> {
        let appointment = self.appointment(appointment_id).await?;

        if appointment.user_id != patient_id {
            warn!(
                "Patient {} tried to pay for appointment {} owned by {}",
                patient_id, appointment_id, appointment.user_id
            );
            return Err(PaymentError::Unauthorized);
        }
        if appointment.cancelled {
            return Err(PaymentError::Cancelled);
        }

        let amount = minor_units(appointment.amount)?;
        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                amount,
                currency: self.currency.clone(),
                receipt: appointment.id.to_string(),
            })
            .await?;

        info!(
            "Order {} created for appointment {} ({} {})",
            order.id, appointment_id, order.amount, order.currency
        );
        Ok(order)
    }

    pub async fn confirm_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<AppointmentRecord, PaymentError> {
        let order_id = request.razorpay_order_id.trim();

        if let (Some(payment_id), Some(signature)) =
            (&request.razorpay_payment_id, &request.razorpay_signature)
        {
            if !self
                .gateway
                .verify_payment_signature(order_id, payment_id, signature)
            {
                warn!("Signature mismatch for order {}", order_id);
                return Err(PaymentError::InvalidSignature);
            }
        }

        let order = self.gateway.fetch_order(order_id).await?;
        if !order.is_paid() {
            info!("Order {} is {:?}, not paid", order.id, order.status);
            return Err(PaymentError::NotPaid);
        }

        let appointment_id = order
            .receipt
            .as_deref()
            .and_then(|receipt| Uuid::parse_str(receipt).ok())
            .ok_or(PaymentError::MissingReceipt)?;

        let appointment = self
            .db
            .appointments
            .update_appointment(appointment_id, AppointmentUpdate::paid())
            .await?
            .ok_or(PaymentError::NotFound)?;

        info!("Appointment {} paid via order {}", appointment_id, order.id);
        Ok(appointment)
    }

    async fn appointment(&self, appointment_id: Uuid) -> Result<AppointmentRecord, PaymentError> {
        self.db
            .appointments
            .get_appointment(appointment_id)
            .await?
            .ok_or(PaymentError::NotFound)
    }
}

/// Gateway amounts are integers in the currency's smallest unit.
fn minor_units(amount: f64) -> Result<i64, PaymentError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(PaymentError::InvalidAmount);
    }
    Ok((amount * 100.0).round() as i64)
}
