use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::Level;

use appointment_cell::router::{
    admin_appointment_routes, doctor_appointment_routes, user_appointment_routes,
};
use auth_cell::router::{admin_auth_routes, auth_routes, doctor_auth_routes, user_auth_routes};
use doctor_cell::router::{admin_doctor_routes, doctor_routes};
use patient_cell::router::patient_routes;
use payment_cell::router::payment_routes;
use shared_utils::AppState;

async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "API Working"
    }))
}

/// Role groups mirror the three client apps: patients, doctors and the admin panel.
pub fn create_router(state: AppState) -> Router {
    let user = Router::new()
        .merge(user_auth_routes(state.clone()))
        .merge(patient_routes(state.clone()))
        .merge(user_appointment_routes(state.clone()))
        .merge(payment_routes(state.clone()));

    let doctor = Router::new()
        .merge(doctor_auth_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(doctor_appointment_routes(state.clone()));

    let admin = Router::new()
        .merge(admin_auth_routes(state.clone()))
        .merge(admin_doctor_routes(state.clone()))
        .merge(admin_appointment_routes(state.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .nest("/api/user", user)
        .nest("/api/doctor", doctor)
        .nest("/api/admin", admin)
        .nest("/api/auth", auth_routes(state))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
}
