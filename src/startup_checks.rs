//! Startup requirement validation for rasdaemon-exporter.
//!
//! A missing database is not fatal: rasdaemon creates it on its first
//! recorded event, and scrapes answer 503 until then.

use nix::unistd::geteuid;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Validate all runtime requirements
pub fn validate_requirements(db_file: &Path) -> Result<(), ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_user_privileges();
    check_database_access(db_file)?;

    info!("✅ All runtime requirements validated");
    Ok(())
}

fn check_user_privileges() {
    if geteuid().is_root() {
        debug!("Running as root (uid=0)");
    } else {
        info!("Not running as root - the rasdaemon database must be readable by this user");
    }
}

/// Check that the database exists and can be opened for reading.
fn check_database_access(db_file: &Path) -> Result<(), ValidationError> {
    match fs::metadata(db_file) {
        Ok(meta) if meta.is_dir() => {
            error!("❌ {} is a directory, not a database file", db_file.display());
            Err(ValidationError::NotAFile(db_file.display().to_string()))
        }
        Ok(meta) => {
            if let Err(e) = File::open(db_file) {
                error!("❌ Cannot read {}: {}", db_file.display(), e);
                error!("   Run the exporter as root or grant read access to the rasdaemon database");
                return Err(ValidationError::DatabaseUnreadable(format!(
                    "{}: {}",
                    db_file.display(),
                    e
                )));
            }
            info!(
                "✅ rasdaemon database readable: {} ({} bytes)",
                db_file.display(),
                meta.len()
            );
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("⚠️  rasdaemon database {} does not exist yet", db_file.display());
            warn!("   Scrapes return 503 until rasdaemon records its first event");
            Ok(())
        }
        Err(e) => {
            error!("❌ Cannot access {}: {}", db_file.display(), e);
            Err(ValidationError::DatabaseUnreadable(format!(
                "{}: {}",
                db_file.display(),
                e
            )))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("rasdaemon database is not readable: {0}")]
    DatabaseUnreadable(String),

    #[error("rasdaemon database path is not a file: {0}")]
    NotAFile(String),
}
