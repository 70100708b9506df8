use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>, frontend_dir: &str) -> Router {
    Router::new()
        .route("/health", get(handlers::healthcheck))
        .route("/api/build", get(handlers::build_info))
        // Checkmk inventory
        .route("/api/sites", get(handlers::sites::list_sites))
        .route("/api/hosts", get(handlers::hosts::list_hosts))
        .route("/api/services", get(handlers::services::list_services))
        // Downtime
        .route("/api/downtime", post(handlers::downtime::create_downtime))
        // Operation log
        .route(
            "/api/log",
            get(handlers::oplog::list_log).delete(handlers::oplog::clear_log),
        )
        // Static files (frontend)
        .fallback_service(ServeDir::new(frontend_dir))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
