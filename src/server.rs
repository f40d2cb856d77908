//! HTTP router construction.

use axum::{middleware, routing::get, Router};

use crate::handlers::{access_log, metrics_handler, not_found_handler};
use crate::state::SharedState;

/// Builds the exporter router: `GET /metrics`, everything else 404.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(state.clone(), access_log))
        .with_state(state)
}
