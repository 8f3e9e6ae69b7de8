//! TargetUZ Server
//!
//! REST API server for the TargetUZ marketplace platform: wallet top-ups,
//! order lifecycle, and escrow settlement.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings
//! targetuz-server
//!
//! # Start with custom config
//! targetuz-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! TARGETUZ__SERVER__PORT=8080 targetuz-server
//! ```

mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use targetuz_api::{create_router, AppState};
use targetuz_db::{Database, DatabaseConfig};

use crate::config::ServerConfig;

/// TargetUZ platform server
#[derive(Parser, Debug)]
#[command(name = "targetuz-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, env = "TARGETUZ_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "TARGETUZ_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "TARGETUZ_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TARGETUZ_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, env = "TARGETUZ_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration, then apply CLI overrides
    let mut server_config = ServerConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(db_url) = args.database_url {
        server_config.database.postgres_url = db_url;
    }
    server_config.logging.level = args.log_level;
    server_config.logging.format = args.log_format;

    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting TargetUZ server"
    );

    // Initialize database
    let db = init_database(&server_config).await?;

    // The durable settlement engine; every money movement goes through it
    let engine = Arc::new(db.payments_repo());

    // Create application state and router
    let state = Arc::new(AppState::new(db, engine));
    let app = create_router(state);

    let addr = server_config.server.socket_addr()?;
    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(server_config.server.shutdown_timeout()))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber.with(fmt::layer().json().with_target(true)).init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .init();
        }
    }

    Ok(())
}

/// Connect to PostgreSQL and run migrations
async fn init_database(config: &ServerConfig) -> anyhow::Result<Arc<Database>> {
    tracing::info!("Connecting to database...");

    let db_config = DatabaseConfig {
        postgres_url: config.database.postgres_url.clone(),
        pg_max_connections: config.database.max_connections,
        pg_min_connections: config.database.min_connections,
        pg_acquire_timeout_secs: config.database.connect_timeout_secs,
    };

    let db = Database::connect(&db_config).await?;

    if config.database.run_migrations {
        db.migrate().await?;
    }

    if !db.health_check().await {
        anyhow::bail!("Database health check failed");
    }
    tracing::info!("Database ready");

    Ok(Arc::new(db))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    // Allow time for in-flight requests to complete
    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "Waiting for in-flight requests to complete..."
    );
    tokio::time::sleep(timeout).await;
}
