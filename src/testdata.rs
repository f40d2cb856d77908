//! Synthetic rasdaemon database generation.
//!
//! Produces a SQLite file with the same `mc_event` layout rasdaemon writes,
//! filled with random memory controller events, so the exporter can be run
//! on machines without EDAC hardware.

use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// `mc_event` schema as created by rasdaemon.
pub const MC_EVENT_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS mc_event (\
    id INTEGER PRIMARY KEY, \
    timestamp TEXT, \
    err_count INTEGER, \
    err_type TEXT, \
    err_msg TEXT, \
    label TEXT, \
    mc INTEGER, \
    top_layer INTEGER, \
    middle_layer INTEGER, \
    lower_layer INTEGER, \
    address INTEGER, \
    grain INTEGER, \
    syndrome INTEGER, \
    driver_detail TEXT)";

const ERR_TYPES: &[&str] = &["Corrected", "Uncorrected"];
const MAX_ERR_COUNT: i64 = 16;
const MAX_LAYER: i64 = 3;
const HISTORY_SECONDS: i64 = 7 * 24 * 3600;

/// Errors raised while generating test data.
#[derive(Debug, thiserror::Error)]
pub enum TestdataError {
    #[error("refusing to overwrite existing file {} (use --force)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Parameters of a generated database.
#[derive(Debug, Clone)]
pub struct TestdataOptions {
    /// Number of memory controllers events are spread across.
    pub controllers: u32,
    /// Number of `mc_event` rows to insert.
    pub events: usize,
    /// Seed for reproducible output; random when `None`.
    pub seed: Option<u64>,
    /// Replace an existing file.
    pub force: bool,
}

impl Default for TestdataOptions {
    fn default() -> Self {
        Self {
            controllers: 2,
            events: 200,
            seed: None,
            force: false,
        }
    }
}

/// Writes a synthetic rasdaemon database to `path` and returns the total
/// `err_count` inserted.
pub fn generate(path: &Path, options: &TestdataOptions) -> Result<i64, TestdataError> {
    if path.exists() {
        if !options.force {
            return Err(TestdataError::AlreadyExists(path.to_path_buf()));
        }
        fs::remove_file(path)?;
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut conn = Connection::open(path)?;
    conn.execute_batch(MC_EVENT_SCHEMA)?;

    let now = Utc::now();
    let controllers = options.controllers.max(1) as i64;
    let mut total = 0i64;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO mc_event (timestamp, err_count, err_type, err_msg, label, mc, \
             top_layer, middle_layer, lower_layer, address, grain, syndrome, driver_detail) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )?;

        for _ in 0..options.events {
            let mc = rng.gen_range(0..controllers);
            // -1 marks a layer EDAC could not resolve; inner layers follow
            let top_layer = rng.gen_range(-1..=MAX_LAYER);
            let middle_layer = if top_layer < 0 {
                -1
            } else {
                rng.gen_range(-1..=MAX_LAYER)
            };
            let lower_layer = if middle_layer < 0 {
                -1
            } else {
                rng.gen_range(-1..=MAX_LAYER)
            };
            let err_type = ERR_TYPES[rng.gen_range(0..ERR_TYPES.len())];
            let err_count = rng.gen_range(1..=MAX_ERR_COUNT);
            let timestamp = now - ChronoDuration::seconds(rng.gen_range(0..HISTORY_SECONDS));
            let address: i64 = rng.gen_range(0..(1i64 << 40)) & !0xfff;

            stmt.execute(params![
                timestamp.format("%Y-%m-%d %H:%M:%S %z").to_string(),
                err_count,
                err_type,
                "memory read error",
                format!("CPU_SrcID#{}_MC#{}_Chan#{}_DIMM#0", mc, mc, top_layer),
                mc,
                top_layer,
                middle_layer,
                lower_layer,
                address,
                32,
                0,
                "synthetic",
            ])?;
            total += err_count;
        }
    }
    tx.commit()?;

    debug!("Inserted {} mc_event rows", options.events);
    info!(
        "Generated rasdaemon test database {} ({} events, {} errors)",
        path.display(),
        options.events,
        total
    );
    Ok(total)
}
