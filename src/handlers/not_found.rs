//! Fallback handler for unknown paths.

use axum::http::{StatusCode, Uri};
use tracing::debug;

/// Answers every path except `/metrics` with an empty 404.
pub async fn not_found_handler(uri: Uri) -> StatusCode {
    debug!("No route for {}", uri.path());
    StatusCode::NOT_FOUND
}
