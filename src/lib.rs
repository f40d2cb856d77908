//! rasdaemon exporter library
//!
//! Reads the SQLite database written by the kernel RAS daemon (`rasdaemon`)
//! and renders its memory controller error counts in the Prometheus text
//! exposition format.
//!
//! # Usage
//!
//! ```no_run
//! use rasdaemon_exporter::{db, exposition, families::FAMILIES};
//! use std::path::Path;
//!
//! let snapshots = db::collect(Path::new("/var/lib/rasdaemon/ras-mc_event.db"), FAMILIES)?;
//! print!("{}", exposition::render(&snapshots));
//! # Ok::<(), rasdaemon_exporter::db::DbError>(())
//! ```

pub mod db;
pub mod exposition;
pub mod families;
pub mod telemetry;
pub mod testdata;

// Re-export main types for convenience
pub use db::{DbError, FamilySnapshot, Sample, SampleValue};
pub use families::{MetricFamily, MetricKind, FAMILIES, MC_EVENTS};
pub use telemetry::ExporterTelemetry;
