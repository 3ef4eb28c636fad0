use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{Database, DbResult};
use shared_integrations::razorpay::verify_payment_signature;
use shared_integrations::{
    CreateOrderRequest, GatewayError, GatewayOrder, ImageStore, OrderStatus, PaymentGateway,
    UploadedImage,
};
use shared_models::address::Address;
use shared_models::auth::{Role, User};
use shared_models::doctor::DoctorRecord;
use shared_models::patient::PatientRecord;

use crate::form::FormData;
use crate::state::AppState;

pub struct TestConfig {
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    pub razorpay_key_secret: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            admin_email: "admin@prescripto.test".to_string(),
            admin_password: "qwerty123".to_string(),
            razorpay_key_secret: "rzp_test_secret".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            jwt_secret: self.jwt_secret.clone(),
            admin_email: self.admin_email.clone(),
            admin_password: self.admin_password.clone(),
            razorpay_key_id: "rzp_test_key".to_string(),
            razorpay_key_secret: self.razorpay_key_secret.clone(),
            ..AppConfig::default()
        }
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl TestUser {
    pub fn new(id: impl Into<String>, email: &str, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.to_string(),
            role,
        }
    }

    pub fn patient(patient: &PatientRecord) -> Self {
        Self::new(patient.id.to_string(), &patient.email, Role::Patient)
    }

    pub fn doctor(doctor: &DoctorRecord) -> Self {
        Self::new(doctor.id.to_string(), &doctor.email, Role::Doctor)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, email, Role::Admin)
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            role: self.role,
            email: Some(self.email.clone()),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let claims = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("HS256 signing with an in-memory key cannot fail")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-2))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

pub fn doctor_record(name: &str, email: &str, fees: f64) -> DoctorRecord {
    DoctorRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        image: None,
        speciality: "General physician".to_string(),
        degree: "MBBS".to_string(),
        experience: "4 Years".to_string(),
        about: "Focused on preventive medicine and early diagnosis.".to_string(),
        fees,
        address: Address::new("17th Cross, Richmond", "Circle, Ring Road, London"),
        available: true,
        created_at: Utc::now(),
    }
}

pub async fn seed_doctor(db: &Database, name: &str, fees: f64) -> DbResult<DoctorRecord> {
    let email = format!("{}@prescripto.test", Uuid::new_v4().simple());
    db.doctors.insert_doctor(doctor_record(name, &email, fees)).await
}

pub async fn seed_patient(db: &Database, name: &str) -> DbResult<PatientRecord> {
    let email = format!("{}@patients.test", Uuid::new_v4().simple());
    db.patients
        .insert_patient(PatientRecord::new(
            name.to_string(),
            email,
            "not-a-real-hash".to_string(),
        ))
        .await
}

/// Fills multipart text fields directly, without going through a request.
pub trait FormFields {
    fn with_field(self, name: &str, value: &str) -> Self;
}

impl FormFields for FormData {
    fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }
}

/// In-process gateway; orders stay `created` until `mark_paid`.
pub struct MockPaymentGateway {
    secret: String,
    orders: Mutex<HashMap<String, GatewayOrder>>,
}

impl MockPaymentGateway {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            orders: Mutex::new(HashMap::new()),
        }
    }

    pub async fn mark_paid(&self, order_id: &str) {
        if let Some(order) = self.orders.lock().await.get_mut(order_id) {
            order.status = OrderStatus::Paid;
            order.amount_paid = order.amount;
        }
    }

    pub async fn order_count(&self) -> usize {
        self.orders.lock().await.len()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let order = GatewayOrder {
            id: format!("order_{}", Uuid::new_v4().simple()),
            amount: request.amount,
            amount_paid: 0,
            currency: request.currency,
            receipt: Some(request.receipt),
            status: OrderStatus::Created,
            created_at: Some(Utc::now().timestamp()),
        };
        self.orders
            .lock()
            .await
            .insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<GatewayOrder, GatewayError> {
        self.orders
            .lock()
            .await
            .get(order_id)
            .cloned()
            .ok_or_else(|| GatewayError::Api {
                status: 400,
                message: "The id provided does not exist".to_string(),
            })
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_payment_signature(&self.secret, order_id, payment_id, signature)
    }
}

#[derive(Default)]
pub struct MockImageStore {
    uploads: Mutex<Vec<String>>,
}

impl MockImageStore {
    pub async fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().await.clone()
    }
}

#[async_trait]
impl ImageStore for MockImageStore {
    async fn upload(&self, folder: &str, image: UploadedImage) -> Result<String, GatewayError> {
        let name = image
            .file_name
            .unwrap_or_else(|| format!("{}.png", Uuid::new_v4().simple()));
        let url = format!("https://images.test/{}/{}", folder, name);
        self.uploads.lock().await.push(url.clone());
        Ok(url)
    }
}

/// In-memory state with mock collaborators the test can still reach.
pub struct TestState {
    pub config: TestConfig,
    pub state: AppState,
    pub payments: Arc<MockPaymentGateway>,
    pub images: Arc<MockImageStore>,
}

impl TestState {
    pub fn db(&self) -> &Database {
        &self.state.db
    }

    pub fn token_for(&self, user: &TestUser) -> String {
        JwtTestUtils::create_test_token(user, &self.config.jwt_secret, None)
    }
}

pub fn test_state() -> TestState {
    let config = TestConfig::default();
    let payments = Arc::new(MockPaymentGateway::new(&config.razorpay_key_secret));
    let images = Arc::new(MockImageStore::default());
    let state = AppState::new(
        config.to_app_config(),
        Database::in_memory(),
        payments.clone(),
        images.clone(),
    );

    TestState {
        config,
        state,
        payments,
        images,
    }
}
