//! Configuration management for rasdaemon-exporter.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9797;
pub const DEFAULT_DB_FILE: &str = "/var/lib/rasdaemon/ras-mc_event.db";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const VALID_LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Exporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    #[serde(alias = "listen-address")]
    pub listen_address: Option<String>,
    pub port: Option<u16>,

    // rasdaemon database
    #[serde(alias = "rasdaemon_db_file", alias = "rasdaemon-db-file")]
    pub db_file: Option<PathBuf>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
    /// Log one line per HTTP request
    #[serde(alias = "log-requests")]
    pub log_requests: Option<bool>,

    // Feature flags
    #[serde(alias = "enable-telemetry")]
    pub enable_telemetry: Option<bool>,

    // TLS/SSL configuration
    #[serde(alias = "enable-tls")]
    pub enable_tls: Option<bool>,
    #[serde(alias = "tls-cert-path")]
    pub tls_cert_path: Option<String>,
    #[serde(alias = "tls-key-path")]
    pub tls_key_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: Some(DEFAULT_LISTEN_ADDR.to_string()),
            port: Some(DEFAULT_PORT),
            db_file: Some(PathBuf::from(DEFAULT_DB_FILE)),
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
            log_requests: Some(false),
            enable_telemetry: Some(true),
            enable_tls: Some(false),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Config {
    /// Effective listen address; an empty string means all interfaces.
    pub fn listen_address(&self) -> &str {
        match self.listen_address.as_deref() {
            None | Some("") => DEFAULT_LISTEN_ADDR,
            Some(addr) => addr,
        }
    }

    /// Resolves the listen address, which may be an IP literal or a host name.
    pub fn socket_addrs(&self) -> std::io::Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (self.listen_address(), self.port())
            .to_socket_addrs()?
            .collect();
        if addrs.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no addresses found",
            ));
        }
        Ok(addrs)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn db_file(&self) -> PathBuf {
        self.db_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.port() == 0 {
        return Err("port must be between 1 and 65535".into());
    }

    if let Err(e) = cfg.socket_addrs() {
        return Err(format!(
            "Invalid listen_address '{}', expected an IP address or resolvable host name ({})",
            cfg.listen_address(),
            e
        )
        .into());
    }

    let level = cfg.log_level();
    if !VALID_LOG_LEVELS.contains(&level) {
        return Err(format!(
            "Invalid log_level '{}', expected one of: {}",
            level,
            VALID_LOG_LEVELS.join(", ")
        )
        .into());
    }

    if cfg.db_file().as_os_str().is_empty() {
        return Err("db_file must not be empty".into());
    }

    // TLS validation
    if cfg.enable_tls.unwrap_or(false) {
        let cert_path = cfg.tls_cert_path.as_deref();
        let key_path = cfg.tls_key_path.as_deref();

        match (cert_path, key_path) {
            (None, None) => {
                return Err(
                    "TLS is enabled but neither tls_cert_path nor tls_key_path are set".into(),
                );
            }
            (Some(_), None) => {
                return Err("TLS is enabled but tls_key_path is not set".into());
            }
            (None, Some(_)) => {
                return Err("TLS is enabled but tls_cert_path is not set".into());
            }
            (Some(cert), Some(key)) => {
                check_pem_file(cert, "certificate")?;
                check_pem_file(key, "private key")?;
            }
        }
    }

    Ok(())
}

fn check_pem_file(path: &str, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => Err(format!("TLS {} file is empty: {}", what, path).into()),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("TLS {} file not found: {}", what, path).into())
        }
        Err(e) => Err(format!("TLS {} file is not readable: {} ({})", what, path, e).into()),
    }
}

/// Resolves the log level from the legacy -d/-v/-q switches, --log-level and the config.
fn resolve_log_level(args: &Args) -> Option<LogLevel> {
    if args.debug {
        Some(LogLevel::Debug)
    } else if args.verbose {
        Some(LogLevel::Info)
    } else if args.quiet {
        Some(LogLevel::Error)
    } else {
        args.log_level
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(addr) = &args.listen_address {
        config.listen_address = Some(addr.clone());
    }
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }
    if let Some(db_file) = &args.rasdaemon_db_file {
        config.db_file = Some(db_file.clone());
    }

    if let Some(level) = resolve_log_level(args) {
        config.log_level = Some(level.as_str().to_string());
    }
    if args.verbose || args.debug {
        config.log_requests = Some(true);
    }

    if args.disable_telemetry {
        config.enable_telemetry = Some(false);
    }

    // TLS configuration: CLI wins if provided
    if args.enable_tls {
        config.enable_tls = Some(true);
    }
    if let Some(cert_path) = &args.tls_cert {
        config.tls_cert_path = Some(cert_path.to_string_lossy().to_string());
    }
    if let Some(key_path) = &args.tls_key {
        config.tls_key_path = Some(key_path.to_string_lossy().to_string());
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => {
            // Try default locations
            let defaults = [
                "/etc/rasdaemon-exporter/config.yaml",
                "/etc/rasdaemon-exporter/config.yml",
                "./rasdaemon-exporter.yaml",
                "./rasdaemon-exporter.yml",
            ];

            match defaults.iter().find(|p| Path::new(p).exists()) {
                Some(p) => PathBuf::from(p),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)?;
    let mut config = parse_config(&path, &content)?;
    fill_defaults(&mut config);
    Ok(config)
}

fn parse_config(path: &Path, content: &str) -> Result<Config, Box<dyn std::error::Error>> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Fills keys a user config file left out with the built-in defaults.
fn fill_defaults(config: &mut Config) {
    let defaults = Config::default();
    config.listen_address = config.listen_address.take().or(defaults.listen_address);
    config.port = config.port.or(defaults.port);
    config.db_file = config.db_file.take().or(defaults.db_file);
    config.log_level = config.log_level.take().or(defaults.log_level);
    config.log_requests = config.log_requests.or(defaults.log_requests);
    config.enable_telemetry = config.enable_telemetry.or(defaults.enable_telemetry);
    config.enable_tls = config.enable_tls.or(defaults.enable_tls);
}

/// Renders configuration in the requested format
pub fn render_config(
    config: &Config,
    format: ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(output)
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, format)?);
    Ok(())
}
