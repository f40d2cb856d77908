//! Per-request access logging.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;

use crate::state::SharedState;

/// Logs method, path, status and latency of every request when
/// `log_requests` is enabled.
pub async fn access_log(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    if !state.log_requests {
        return next.run(request).await;
    }

    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    info!(
        target: "rasdaemon_exporter::access",
        "{} {} {} {:.2}ms",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    response
}
