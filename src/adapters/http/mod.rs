pub mod error;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::adapters::http::state::HttpState;

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn router(state: HttpState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/models", get(routes::list_models))
        .route("/test-images", get(routes::list_test_images))
        .route("/predict", post(routes::predict))
        .route("/predict-by-id", post(routes::predict_by_id))
        .route("/describe", post(routes::describe))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
