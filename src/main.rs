//! rasdaemon-exporter - version 0.1.0
//!
//! Prometheus exporter for memory controller errors recorded by rasdaemon.
//! This is the main entry point that initializes the server and handles subcommands.

mod cli;
mod commands;
mod config;
mod handlers;
mod server;
mod startup_checks;
mod state;

use axum_server::{tls_rustls::RustlsConfig, Handle};
use clap::Parser;
use rasdaemon_exporter::ExporterTelemetry;
use std::sync::Arc;
use std::time::Duration;
use tokio::{net::TcpListener, signal};
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;

use cli::{Args, Commands};
use commands::{command_check, command_config, command_generate_testdata, command_test};
use config::{resolve_config, show_config, validate_effective_config, Config};
use server::build_router;
use state::AppState;

/// In-flight requests get this long to finish after SIGTERM on the TLS listener.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let level = match config.log_level() {
        "off" => LevelFilter::OFF,
        "error" => LevelFilter::ERROR,
        "info" => LevelFilter::INFO,
        "debug" => LevelFilter::DEBUG,
        "trace" => LevelFilter::TRACE,
        _ => LevelFilter::WARN,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Logging initialized with level: {}", level);
    Ok(())
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        if let Commands::Config {
            output,
            format,
            commented,
        } = command
        {
            return command_config(output.clone(), *format, *commented);
        }

        // check reports configuration problems itself instead of exiting early
        if let Commands::Check = command {
            let config = resolve_config(&args)?;
            setup_logging(&config)?;
            return command_check(&config);
        }

        let config = load_validated_config(&args)?;
        setup_logging(&config)?;

        return match command {
            Commands::Test {
                iterations,
                summary,
            } => command_test(*iterations, *summary, &config),

            Commands::GenerateTestdata {
                output,
                controllers,
                events,
                seed,
                force,
            } => command_generate_testdata(output.clone(), *controllers, *events, *seed, *force),

            Commands::Config { .. } | Commands::Check => {
                unreachable!("Config and Check handled above")
            }
        };
    }

    // Load configuration for main server mode
    let config = load_validated_config(&args)?;
    setup_logging(&config)?;

    info!("Starting rasdaemon-exporter");

    let db_file = config.db_file();
    if let Err(e) = startup_checks::validate_requirements(&db_file) {
        error!("❌ Startup validation failed: {}", e);
        error!("   The exporter will start but scrapes will fail until this is fixed!");
    }

    let telemetry = if config.enable_telemetry.unwrap_or(true) {
        let revision = option_env!("VERGEN_GIT_SHA").unwrap_or("unknown");
        Some(ExporterTelemetry::new(env!("CARGO_PKG_VERSION"), revision)?)
    } else {
        debug!("Exporter telemetry disabled");
        None
    };

    let state = Arc::new(AppState::new(&config, telemetry));
    let app = build_router(state);

    // validate_effective_config() already checked that the address resolves
    let addr = config
        .socket_addrs()?
        .into_iter()
        .next()
        .ok_or("listen_address resolved to no addresses")?;
    debug!("{} resolved to {}", config.listen_address(), addr);

    if config.enable_tls.unwrap_or(false) {
        // Paths are present: validate_effective_config() rejects TLS without them
        let (Some(cert_path), Some(key_path)) =
            (config.tls_cert_path.as_ref(), config.tls_key_path.as_ref())
        else {
            return Err("TLS enabled without tls_cert_path/tls_key_path".into());
        };

        info!("Loading TLS certificate from: {}", cert_path);
        info!("Loading TLS private key from: {}", key_path);

        let tls_config = RustlsConfig::from_pem_file(cert_path, key_path)
            .await
            .map_err(|e| {
                error!("Failed to load TLS configuration: {}", e);
                e
            })?;

        info!(
            "rasdaemon-exporter listening on https://{}/metrics (database: {})",
            addr,
            db_file.display()
        );

        let handle = Handle::new();
        tokio::spawn({
            let handle = handle.clone();
            async move {
                shutdown_signal().await;
                handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
            }
        });

        axum_server::bind_rustls(addr, tls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| {
                error!("Server error: {}", e);
                e
            })?;
    } else {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind {}: {}", addr, e);
            e
        })?;
        info!(
            "rasdaemon-exporter listening on http://{}/metrics (database: {})",
            addr,
            db_file.display()
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("Server error: {}", e);
                e
            })?;
    }

    info!("rasdaemon-exporter stopped gracefully");
    Ok(())
}
