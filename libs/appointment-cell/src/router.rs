use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::AppState;

use crate::handlers;

pub fn user_appointment_routes(state: AppState) -> Router {
    Router::new()
        .route("/book-appointment", post(handlers::book_appointment))
        .route("/appointments", get(handlers::list_user_appointments))
        .route("/cancel-appointment", post(handlers::cancel_user_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn doctor_appointment_routes(state: AppState) -> Router {
    Router::new()
        .route("/appointments", get(handlers::list_doctor_appointments))
        .route("/complete-appointment", post(handlers::complete_appointment))
        .route("/cancel-appointment", post(handlers::cancel_doctor_appointment))
        .route("/dashboard", get(handlers::doctor_dashboard))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn admin_appointment_routes(state: AppState) -> Router {
    Router::new()
        .route("/appointments", get(handlers::list_all_appointments))
        .route("/cancel-appointment", post(handlers::admin_cancel_appointment))
        .route("/dashboard", get(handlers::admin_dashboard))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
