//! # Tariff Search Server Main Driver
//!
//! ## Purpose
//! Main entry point for the tariff reference search server. Loads the four
//! reference tables, wires up the search engine and starts the web server.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration file, command line arguments, environment variables
//! - **Output**: Running web server with search API endpoints
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Load the dataset tables into the registry
//! 4. Initialize the search engine
//! 5. Start the web API server
//! 6. Handle shutdown signals gracefully

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use tariff_reference_search::{
    api::ApiServer,
    config::Config,
    datasets::DatasetRegistry,
    errors::{Result, SearchError},
    internal_error,
    search::SearchEngine,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("tariff-search-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Search server for the Turkish customs tariff reference tables")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Load the datasets, report their status and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");
    let mut config = Config::from_file(config_path)?;

    // Override port if specified
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let config = Arc::new(config);

    // Initialize logging
    init_logging(&config)?;

    info!("Starting Tariff Reference Search v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", config_path);

    // Run dataset health checks if requested
    if matches.get_flag("check-health") {
        return run_health_checks(&config);
    }

    // Initialize application components
    let app_state = initialize_components(config.clone())?;

    // Start the API server
    let server = ApiServer::new(app_state).await?;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "Tariff search server started on {}:{}",
        config.server.host, config.server.port
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    info!("Tariff search server shut down");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    // `logging.level` takes full EnvFilter directives ("info", "debug,actix_web=warn")
    let filter =
        tracing_subscriber::EnvFilter::try_new(&config.logging.level).map_err(|_| {
            SearchError::Config {
                message: format!("Invalid log level: {}", config.logging.level),
            }
        })?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);
    if config.logging.json_format {
        tracing_subscriber::registry()
            .with(fmt_layer.json().with_filter(filter))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt_layer.with_filter(filter))
            .init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}

/// Initialize all application components
fn initialize_components(config: Arc<Config>) -> Result<AppState> {
    info!("Loading dataset registry...");
    let registry = Arc::new(DatasetRegistry::load(&config.datasets));

    if !registry.all_available() {
        // Serve the remaining datasets; the failed ones answer 503
        for status in registry.statuses().iter().filter(|s| !s.available) {
            warn!(
                dataset = %status.dataset,
                error = status.error.as_deref().unwrap_or(""),
                "dataset unavailable, its endpoints will answer with a server error"
            );
        }
    }

    let search_engine = Arc::new(SearchEngine::new(config.clone(), registry));

    info!("All components initialized");
    Ok(AppState {
        config,
        search_engine,
    })
}

/// Load the datasets, print their status and exit with an error when any
/// table failed to load
fn run_health_checks(config: &Arc<Config>) -> Result<()> {
    info!("Running dataset health checks...");

    let registry = DatasetRegistry::load(&config.datasets);
    for status in registry.statuses() {
        if status.available {
            info!("✓ {} ({} rows)", status.dataset, status.rows);
        } else {
            error!(
                "✗ {}: {}",
                status.dataset,
                status.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if registry.all_available() {
        info!("All health checks passed!");
        Ok(())
    } else {
        Err(internal_error!("One or more datasets failed to load"))
    }
}
