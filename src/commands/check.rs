//! Check command implementation.
//!
//! Validates configuration and the rasdaemon database.

use rasdaemon_exporter::{db, DbError};

use crate::config::{validate_effective_config, Config};

/// Validates configuration and inspects the rasdaemon database.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 rasdaemon-exporter - System Check");
    println!("===================================");

    let mut all_ok = true;

    // Check configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
            println!(
                "   ├─ Listen: {}:{}",
                config.listen_address(),
                config.port()
            );
            println!("   └─ Database: {}", config.db_file().display());
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    // Check database
    let db_file = config.db_file();
    println!("\n💾 Checking rasdaemon database...");
    match db::inspect(&db_file) {
        Ok(report) => {
            println!(
                "   ✅ Opened read-only: {} ({} bytes)",
                report.path.display(),
                report.size_bytes
            );
            if report.has_mc_event {
                println!("   ✅ mc_event table present ({} rows)", report.mc_event_rows);
            } else {
                println!("   ❌ mc_event table missing");
            }
            if !report.missing_columns.is_empty() {
                println!(
                    "   ❌ mc_event columns missing: {}",
                    report.missing_columns.join(", ")
                );
            }
            if !report.is_usable() {
                all_ok = false;
            }
        }
        Err(DbError::NotFound(path)) => {
            println!("   ❌ Database not found: {}", path.display());
            println!("      rasdaemon creates it when recording is enabled (rasdaemon --record)");
            all_ok = false;
        }
        Err(e @ DbError::Access { .. }) => {
            println!("   ❌ {}", e);
            println!("      Run the exporter as root or grant read access to the database directory");
            all_ok = false;
        }
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - exporter is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review the output above");
        std::process::exit(1);
    }
}
