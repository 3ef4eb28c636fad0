use axum::{routing::post, Router};

use shared_utils::AppState;

use crate::handlers;

pub fn user_auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(handlers::register_patient))
        .route("/login", post(handlers::login_patient))
        .with_state(state)
}

pub fn doctor_auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(handlers::login_doctor))
        .with_state(state)
}

pub fn admin_auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/login", post(handlers::login_admin))
        .with_state(state)
}

pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/validate", post(handlers::validate_token))
        .with_state(state)
}
