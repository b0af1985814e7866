pub mod health;
pub mod protected;
pub mod quiz;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::config::Config;
use crate::middleware::auth::require_identity;
use crate::AppState;

/// Every public route, with the identity gate applied to `/protected`.
pub fn router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/protected", get(protected::protected))
        .route_layer(from_fn_with_state(state.clone(), require_identity));

    Router::new()
        .route("/", get(health::home))
        .route("/upload-syllabus", post(upload::upload_syllabus))
        .route("/upload-pyqs", post(upload::upload_pyqs))
        .route("/generate-quiz", get(quiz::generate_quiz))
        .route("/get-quiz", post(quiz::get_quiz))
        .merge(gated)
        .with_state(state)
}

/// The served application: every route plus the request body limit, so an
/// oversized upload is refused with 413 before anything reaches disk.
pub fn app(state: AppState, config: &Config) -> Router {
    router(state).layer(DefaultBodyLimit::max(config.max_upload_bytes))
}
