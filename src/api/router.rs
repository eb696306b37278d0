//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::config::MAX_UPLOAD_BYTES;
use crate::core_state::CoreState;

/// Slack for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the API router with all endpoints under `/api/`.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/session", get(endpoints::session::current))
        .route("/mode", post(endpoints::session::set_mode))
        .route(
            "/upload",
            post(endpoints::upload::upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
        .route("/preview/:id", get(endpoints::session::preview))
        .route("/analyze", post(endpoints::analyze::analyze))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
}
