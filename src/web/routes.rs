//! Router construction and shared response presets.

use axum::Router;
use axum::http::{Method, header};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::{health, search};

/// Cache-Control presets for public endpoints.
pub mod cache {
    /// Show search results (the shared store TTL is shorter; browsers may keep them longer).
    pub const SEARCH: &str = "public, max-age=60";
}

/// Creates the proxy router.
pub fn create_router(app_state: AppState) -> Router {
    // The browser client is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .expose_headers([header::CACHE_CONTROL, header::HeaderName::from_static("x-cache")]);

    Router::new()
        .route("/search/shows", get(search::search_shows))
        .route("/health", get(health::health))
        .with_state(app_state)
        .layer((RequestIdLayer, cors))
}
