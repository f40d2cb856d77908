//! CLI command implementations for rasdaemon-exporter.
//!
//! This module provides implementations for all CLI subcommands:
//! - `check`: Configuration and database validation
//! - `config`: Configuration file generation
//! - `test`: One-shot scrapes against the configured database
//! - `generate`: Synthetic rasdaemon database generation

pub mod check;
pub mod config;
pub mod generate;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use generate::command_generate_testdata;
pub use test::command_test;
