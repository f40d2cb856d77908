//! Generate testdata command implementation.
//!
//! Writes a synthetic rasdaemon database for running the exporter without
//! EDAC hardware.

use rasdaemon_exporter::testdata::{generate, TestdataOptions};
use std::path::PathBuf;
use tracing::debug;

/// Generates a synthetic rasdaemon database.
pub fn command_generate_testdata(
    output: PathBuf,
    controllers: u32,
    events: usize,
    seed: Option<u64>,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    debug!(
        "Generating test data: controllers={}, events={}, output={}",
        controllers,
        events,
        output.display()
    );

    let options = TestdataOptions {
        controllers,
        events,
        seed,
        force,
    };
    let total = generate(&output, &options)?;

    println!(
        "✅ Test database written to: {} ({} events, {} errors)",
        output.display(),
        events,
        total
    );
    println!(
        "   Run: rasdaemon-exporter -f {} test --summary",
        output.display()
    );
    Ok(())
}
