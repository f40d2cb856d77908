//! Metric families exported from the rasdaemon database.
//!
//! Each family maps one SQL query to one Prometheus metric. Every column of
//! the query result except the value column becomes a label, in column order.

use std::fmt;

/// Prometheus metric type of an exported family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one exported metric family.
#[derive(Debug, PartialEq, Eq)]
pub struct MetricFamily {
    /// Metric name as it appears in the exposition.
    pub name: &'static str,
    /// Text of the `# HELP` line.
    pub help: &'static str,
    pub kind: MetricKind,
    /// Query run against the rasdaemon database on every scrape.
    pub query: &'static str,
    /// Result column holding the sample value.
    pub value_column: &'static str,
}

/// Memory controller error counts, summed per controller, layer location and error type.
pub const MC_EVENTS: MetricFamily = MetricFamily {
    name: "rasdaemon_mc_events_total",
    help: "Memory controller errors",
    kind: MetricKind::Counter,
    query: "SELECT mc, top_layer, middle_layer, lower_layer, err_type, \
            SUM(err_count) AS err_count \
            FROM mc_event \
            GROUP BY mc, top_layer, middle_layer, lower_layer, err_type",
    value_column: "err_count",
};

/// Families rendered on every scrape, in rendering order.
pub static FAMILIES: &[MetricFamily] = &[MC_EVENTS];

/// Table queried by [`MC_EVENTS`].
pub const MC_EVENT_TABLE: &str = "mc_event";

/// Columns of `mc_event` the exporter depends on.
pub const MC_EVENT_COLUMNS: &[&str] = &[
    "mc",
    "top_layer",
    "middle_layer",
    "lower_layer",
    "err_type",
    "err_count",
];
