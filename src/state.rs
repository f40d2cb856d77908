//! Application state management for the exporter.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers.

use rasdaemon_exporter::ExporterTelemetry;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// Global application state shared across requests.
pub struct AppState {
    /// rasdaemon database, reopened read-only on every scrape.
    pub db_file: PathBuf,
    /// Internal exporter metrics; `None` when telemetry is disabled.
    pub telemetry: Option<ExporterTelemetry>,
    /// Log one line per HTTP request.
    pub log_requests: bool,
}

impl AppState {
    pub fn new(config: &Config, telemetry: Option<ExporterTelemetry>) -> Self {
        Self {
            db_file: config.db_file(),
            telemetry,
            log_requests: config.log_requests.unwrap_or(false),
        }
    }
}
