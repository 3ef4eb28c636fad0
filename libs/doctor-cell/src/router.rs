use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::form::FORM_BODY_LIMIT;
use shared_utils::AppState;

use crate::handlers;

pub fn doctor_routes(state: AppState) -> Router {
    let public_routes = Router::new().route("/list", get(handlers::list_doctors));

    let protected_routes = Router::new()
        .route("/profile", get(handlers::doctor_profile))
        .route("/update-profile", post(handlers::update_doctor_profile))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

pub fn admin_doctor_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/add-doctor",
            post(handlers::add_doctor).layer(DefaultBodyLimit::max(FORM_BODY_LIMIT)),
        )
        .route("/all-doctors", get(handlers::all_doctors))
        .route("/change-availability", post(handlers::change_availability))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
