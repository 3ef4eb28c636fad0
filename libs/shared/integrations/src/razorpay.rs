use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, error, info};
use urlencoding::encode;

use shared_config::AppConfig;

use crate::error::GatewayError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Attempted,
    Paid,
    #[serde(other)]
    Unknown,
}

/// Order body for `POST /orders`. `amount` is in the currency's minor unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: OrderStatus,
    pub created_at: Option<i64>,
}

impl GatewayOrder {
    pub fn is_paid(&self) -> bool {
        self.status == OrderStatus::Paid
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError>;
    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError>;
    /// Checks the checkout callback signature over `order_id|payment_id`.
    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}

/// Razorpay Orders API client.
/// Based on: https://razorpay.com/docs/api/orders/
pub struct RazorpayClient {
    client: Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl RazorpayClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            key_id: config.razorpay_key_id.clone(),
            key_secret: config.razorpay_key_secret.clone(),
            base_url: config.razorpay_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn ensure_configured(&self) -> Result<(), GatewayError> {
        if self.key_id.is_empty() || self.key_secret.is_empty() || self.base_url.is_empty() {
            return Err(GatewayError::NotConfigured("Razorpay"));
        }
        Ok(())
    }

    async fn read_order(&self, response: reqwest::Response) -> Result<GatewayOrder, GatewayError> {
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Razorpay request failed: {} - {}", status, response_text);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: razorpay_error_description(&response_text),
            });
        }

        Ok(serde_json::from_str(&response_text)?)
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    /// POST /orders
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        self.ensure_configured()?;
        info!(
            "Creating Razorpay order for receipt {} ({} {})",
            request.receipt, request.amount, request.currency
        );

        let url = format!("{}/orders", self.base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&request)
            .send()
            .await?;

        let order = self.read_order(response).await?;
        debug!("Razorpay order {} created with status {:?}", order.id, order.status);
        Ok(order)
    }

    /// GET /orders/{id}
    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError> {
        self.ensure_configured()?;
        debug!("Fetching Razorpay order {}", order_id);

        let url = format!("{}/orders/{}", self.base_url, encode(order_id));
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;

        self.read_order(response).await
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_payment_signature(&self.key_secret, order_id, payment_id, signature)
    }
}

/// Razorpay wraps failures as `{"error": {"description": ...}}`.
fn razorpay_error_description(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value["error"]["description"]
                .as_str()
                .map(|description| description.to_string())
        })
        .unwrap_or_else(|| body.to_string())
}

pub fn payment_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    mac.finalize()
        .into_bytes()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

pub fn verify_payment_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    if secret.is_empty() {
        return false;
    }

    let expected = match decode_hex(signature) {
        Some(bytes) => bytes,
        None => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Strict hex: even length, ASCII hex digits only, either case.
fn decode_hex(value: &str) -> Option<Vec<u8>> {
    if value.len() % 2 != 0 || !value.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    value
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let high = (pair[0] as char).to_digit(16)?;
            let low = (pair[1] as char).to_digit(16)?;
            Some((high * 16 + low) as u8)
        })
        .collect()
}
