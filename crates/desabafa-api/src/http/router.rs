//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing, request body limit.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Room for multipart framing on top of the largest accepted audio file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    let api_routes = Router::new()
        // Accounts
        .route("/users/anonymous", post(handlers::user::create_anonymous))
        .route("/auth/register", post(handlers::user::register))
        .route("/auth/login", post(handlers::user::login))
        .route("/users/{id}/status", get(handlers::user::get_status))
        .route("/users/{id}/stats", get(handlers::user::get_stats))
        .route(
            "/users/{id}/subscription",
            put(handlers::user::update_subscription),
        )
        .route("/users/{id}/sessions", get(handlers::user::list_sessions))
        // Sessions
        .route("/sessions", post(handlers::session::create_session))
        .route("/sessions/{id}", get(handlers::session::get_session))
        .route(
            "/sessions/{id}/messages",
            post(handlers::session::append_message),
        )
        .route("/sessions/{id}/end", post(handlers::session::end_session))
        .route(
            "/sessions/{id}/summary",
            post(handlers::session::summarize_session),
        )
        // Conversation
        .route("/chat", post(handlers::chat::chat))
        .route("/personas", get(handlers::persona::list_personas))
        // Audio
        .route("/audio/transcriptions", post(handlers::audio::transcribe))
        .route("/audio/speech", post(handlers::audio::synthesize))
        .route("/audio/voices", get(handlers::audio::list_voices))
        .route("/audio/{handle}", get(handlers::audio::get_audio));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
