use axum::{middleware, routing::post, Router};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers::{payment_razorpay, verify_razorpay};

pub fn payment_routes(state: AppState) -> Router {
    Router::new()
        .route("/payment-razorpay", post(payment_razorpay))
        .route("/verify-razorpay", post(verify_razorpay))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
