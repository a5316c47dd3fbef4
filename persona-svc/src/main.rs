//! persona-svc - Person enrichment service
//!
//! Stores people and fills in age, gender and country from external name
//! classifiers. Configuration: command line / environment > TOML file >
//! compiled defaults.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use persona_common::config::{load_toml_config, ConfigOverrides, ServiceConfig};
use persona_common::db::init_database;
use persona_svc::classifiers::HttpClassifiers;
use persona_svc::enrichment::EnrichmentOrchestrator;
use persona_svc::repository::SqlitePersonRepository;
use persona_svc::{build_router, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for persona-svc
#[derive(Parser, Debug)]
#[command(name = "persona-svc")]
#[command(about = "Person enrichment service")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "PERSONA_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (e.g. 127.0.0.1:8080)
    #[arg(short, long, env = "PERSONA_BIND_ADDR")]
    bind_addr: Option<String>,

    /// SQLite database URL
    #[arg(long, env = "PERSONA_DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "PERSONA_MAX_CONNECTIONS")]
    max_connections: Option<u32>,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "PERSONA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Age classifier endpoint
    #[arg(long, env = "PERSONA_AGE_URL")]
    age_url: Option<String>,

    /// Gender classifier endpoint
    #[arg(long, env = "PERSONA_GENDER_URL")]
    gender_url: Option<String>,

    /// Nationality classifier endpoint
    #[arg(long, env = "PERSONA_NATIONALITY_URL")]
    nationality_url: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_addr: self.bind_addr.clone(),
            database_url: self.database_url.clone(),
            max_connections: self.max_connections,
            log_level: self.log_level.clone(),
            age_url: self.age_url.clone(),
            gender_url: self.gender_url.clone(),
            nationality_url: self.nationality_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The log level itself may come from the config file
    let toml_config = load_toml_config(args.config.as_deref())
        .context("Failed to load config file")?;
    let config = ServiceConfig::resolve(&args.overrides(), &toml_config)
        .context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting persona-svc v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    info!(
        age_url = %config.classifiers.age_url,
        gender_url = %config.classifiers.gender_url,
        nationality_url = %config.classifiers.nationality_url,
        "Classifier endpoints"
    );

    let db = init_database(&config.database_url, config.max_connections)
        .await
        .context("Failed to initialize database")?;
    info!("Database connection established");

    let classifiers = HttpClassifiers::new(&config.classifiers)
        .context("Failed to construct classifier clients")?;

    let state = AppState::new(
        Arc::new(SqlitePersonRepository::new(db)),
        EnrichmentOrchestrator::from_http(classifiers),
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
