//! Internal exporter metrics.
//!
//! These are registered in their own `prometheus::Registry` and appended to
//! the `/metrics` response after the rasdaemon families.

use prometheus::{Counter, Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::time::Duration;

/// Errors raised while encoding exporter metrics.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("encoded metrics are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Scrape statistics of the exporter itself.
#[derive(Clone)]
pub struct ExporterTelemetry {
    registry: Registry,
    pub scrapes_total: Counter,
    pub scrape_errors_total: Counter,
    pub scrape_duration: Gauge,
}

impl ExporterTelemetry {
    /// Creates and registers all exporter metrics.
    pub fn new(version: &str, revision: &str) -> Result<Self, TelemetryError> {
        let registry = Registry::new();

        let scrapes_total = Counter::new(
            "rasdaemon_exporter_scrapes_total",
            "Number of /metrics requests served",
        )?;
        let scrape_errors_total = Counter::new(
            "rasdaemon_exporter_scrape_errors_total",
            "Number of /metrics requests that failed to read the rasdaemon database",
        )?;
        let scrape_duration = Gauge::new(
            "rasdaemon_exporter_scrape_duration_seconds",
            "Time spent reading the rasdaemon database for the last scrape",
        )?;
        let build_info = GaugeVec::new(
            Opts::new(
                "rasdaemon_exporter_build_info",
                "Build information of rasdaemon-exporter",
            ),
            &["version", "revision"],
        )?;
        build_info.with_label_values(&[version, revision]).set(1.0);

        registry.register(Box::new(scrapes_total.clone()))?;
        registry.register(Box::new(scrape_errors_total.clone()))?;
        registry.register(Box::new(scrape_duration.clone()))?;
        registry.register(Box::new(build_info))?;

        Ok(Self {
            registry,
            scrapes_total,
            scrape_errors_total,
            scrape_duration,
        })
    }

    /// Records one scrape attempt.
    pub fn record_scrape(&self, duration: Duration, success: bool) {
        self.scrapes_total.inc();
        if !success {
            self.scrape_errors_total.inc();
        }
        self.scrape_duration.set(duration.as_secs_f64());
    }

    /// Encodes all exporter metrics in text format.
    pub fn encode(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::with_capacity(1024);
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
