//! HTTP endpoint handlers for the exporter.
//!
//! This module provides handlers for all HTTP endpoints:
//! - `/metrics`: Prometheus metrics endpoint
//! - any other path: empty `404 Not Found`

pub mod access_log;
pub mod metrics;
pub mod not_found;

// Re-export handlers
pub use access_log::access_log;
pub use metrics::metrics_handler;
pub use not_found::not_found_handler;
