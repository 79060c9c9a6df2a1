use std::path::Path;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::{catalog, health, middleware::logging_middleware, sessions, state::AppState};

/// JSON API routes, without static assets
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/info", get(catalog::course_info))
        .route("/providers", get(catalog::list_providers))
        .route("/sample-questions", get(catalog::list_sample_questions))
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/{id}", delete(sessions::end_session))
        .route(
            "/sessions/{id}/messages",
            get(sessions::get_transcript).post(sessions::ask_question),
        )
}

/// Full application: health, JSON API and the single-page UI from `static_dir`
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    let ui = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_router())
        .fallback_service(ui)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging_middleware)),
        )
}
