//! Metrics endpoint handler for Prometheus scraping.
//!
//! Every request opens the rasdaemon database read-only on tokio's blocking
//! pool, renders the exported families and appends the exporter's own
//! telemetry.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use rasdaemon_exporter::{db, exposition, telemetry::TelemetryError, DbError, FAMILIES};
use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::state::SharedState;

/// Error type for metrics endpoint failures.
#[derive(Debug)]
pub enum MetricsError {
    Database(DbError),
    Encoding(TelemetryError),
    Worker(String),
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            MetricsError::Database(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
            MetricsError::Encoding(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            ),
            MetricsError::Worker(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Scrape worker failed: {}", e),
            ),
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{message}\n"),
        )
            .into_response()
    }
}

/// Handler for the /metrics endpoint.
#[instrument(skip(state))]
pub async fn metrics_handler(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, MetricsError> {
    let start = Instant::now();
    debug!("Processing /metrics request");

    let db_file = state.db_file.clone();
    let collected = tokio::task::spawn_blocking(move || db::collect(&db_file, FAMILIES)).await;

    let snapshots = match collected {
        Ok(Ok(snapshots)) => snapshots,
        Ok(Err(e)) => {
            error!("Scrape failed: {}", e);
            record_scrape(&state, start, false);
            return Err(MetricsError::Database(e));
        }
        Err(e) => {
            error!("Scrape worker panicked or was cancelled: {}", e);
            record_scrape(&state, start, false);
            return Err(MetricsError::Worker(e.to_string()));
        }
    };

    let mut body = exposition::render(&snapshots);
    record_scrape(&state, start, true);

    if let Some(telemetry) = &state.telemetry {
        body.push_str(&telemetry.encode().map_err(MetricsError::Encoding)?);
    }

    debug!(
        "Served /metrics in {:.2}ms ({} bytes)",
        start.elapsed().as_secs_f64() * 1000.0,
        body.len()
    );

    Ok(([(header::CONTENT_TYPE, exposition::CONTENT_TYPE)], body))
}

fn record_scrape(state: &SharedState, start: Instant, success: bool) {
    if let Some(telemetry) = &state.telemetry {
        telemetry.record_scrape(start.elapsed(), success);
    }
}
