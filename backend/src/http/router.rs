//! Router configuration for the HTTP API.
//!
//! This module sets up the contribution route, the health check, static
//! file fallback and middleware (CORS, compression, tracing).

use std::path::Path;

use axum::{
    http::header,
    routing::{any, get},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
///
/// Requests outside the contribution prefix and `/health` are served from
/// `public_path` when given.
pub fn create_router(state: AppState, public_path: Option<&Path>) -> Router {
    // Pagination links must be readable from browser clients.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::LINK]);

    // Every method reaches the dispatcher so that non-GET gets its 403.
    // The wildcard needs a non-empty tail, so the bare prefix is routed too.
    let prefix_routes = [
        format!("/{}", state.prefix),
        format!("/{}/", state.prefix),
        format!("/{}/{{*rest}}", state.prefix),
    ];

    let mut router = Router::new().route("/health", get(handlers::health_check));
    for route in &prefix_routes {
        router = router.route(route, any(handlers::contributions));
    }

    if let Some(dir) = public_path {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
