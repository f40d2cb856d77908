//! CLI arguments and subcommands for rasdaemon-exporter.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "rasdaemon-exporter",
    about = "Prometheus exporter for rasdaemon memory controller errors",
    long_about = "Prometheus exporter for rasdaemon memory controller errors.\n\n\
                  Every scrape of /metrics opens the rasdaemon SQLite database read-only \
                  and exports error counts grouped by memory controller, EDAC layer \
                  location and error type.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// The port to listen on
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// The address to listen on (empty = all interfaces)
    #[arg(short = 'l', long)]
    pub listen_address: Option<String>,

    /// The path to the rasdaemon sqlite3 database
    #[arg(short = 'f', long)]
    pub rasdaemon_db_file: Option<PathBuf>,

    /// Include debug messages in logging output
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Restrict logging output to errors only
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Include information messages and request logs in logging output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Log level (overridden by --debug, --verbose and --quiet)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Disable internal rasdaemon_exporter_* metrics
    #[arg(long)]
    pub disable_telemetry: bool,

    /// Enable TLS/SSL for HTTPS
    #[arg(long)]
    pub enable_tls: bool,

    /// Path to TLS certificate file (PEM format)
    #[arg(long)]
    pub tls_cert: Option<PathBuf>,

    /// Path to TLS private key file (PEM format)
    #[arg(long)]
    pub tls_key: Option<PathBuf>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and the rasdaemon database
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Run scrapes against the configured database and print the result
    Test {
        /// Number of test iterations
        #[arg(short = 'n', long, default_value_t = 1)]
        iterations: usize,

        /// Print a per-family summary instead of the exposition text
        #[arg(long)]
        summary: bool,
    },

    /// Generate a synthetic rasdaemon database
    GenerateTestdata {
        /// Output database path
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Number of memory controllers
        #[arg(long, default_value_t = 2)]
        controllers: u32,

        /// Number of mc_event rows
        #[arg(long, default_value_t = 200)]
        events: usize,

        /// Seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
