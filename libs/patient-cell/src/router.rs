use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::form::FORM_BODY_LIMIT;
use shared_utils::AppState;

use crate::handlers::*;

pub fn patient_routes(state: AppState) -> Router {
    Router::new()
        .route("/get-profile", get(get_profile))
        .route(
            "/update-profile",
            post(update_profile).layer(DefaultBodyLimit::max(FORM_BODY_LIMIT)),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
