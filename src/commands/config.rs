//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("rasdaemon-exporter.yaml"));

    let mut content = render_config(&config, format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# rasdaemon-exporter Configuration
# =================================
#
# Server Configuration
# --------------------
# listen_address: "0.0.0.0"    # Listen IP ("" or 0.0.0.0 = all interfaces)
# port: 9797                   # HTTP port
#
# rasdaemon Database
# ------------------
# db_file: /var/lib/rasdaemon/ras-mc_event.db   # Opened read-only on every scrape
#
# Logging
# -------
# log_level: "warn"            # off, error, warn, info, debug, trace
# log_requests: false          # Log one line per HTTP request
#
# Feature Flags
# -------------
# enable_telemetry: true       # Append rasdaemon_exporter_* metrics
#
# TLS/SSL Configuration
# ---------------------
# enable_tls: false            # Enable HTTPS (default: false)
# tls_cert_path: null          # Path to TLS certificate (PEM format)
# tls_key_path: null           # Path to TLS private key (PEM format)
"#;

    format!("{comments}\n{yaml}")
}
