use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod generate;
pub mod health;
pub mod quiz;

/// Builds the application router. Shared between `main` and the test
/// harness so both always serve the same surface.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(quiz::quiz_form_handler))
        .route("/generate", post(generate::generate_handler))
        .route("/api/health", get(health::health_check))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
