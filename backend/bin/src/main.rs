//! Chain Sync Backend Binary
//!
//! Main entry point for the chain-tip sync and history service.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use chain_sync_backend_lib::{
    api::create_app,
    config::{Config, LogFormat},
    constants::blockcypher::DEFAULT_TIMEOUT_SECS,
    data::{
        blockcypher::{AnyApiConnection, ApiConfig, BlockCypherClient, HttpConnection},
        db::{client::DBClient, migrations, repository::postgres::Repository},
    },
    log::initialize_logging,
    services::Services,
};
#[cfg(feature = "mocks")]
use chain_sync_backend_lib::data::{
    blockcypher::MockConnection, db::mock_repository::MockRepository,
};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "chain-sync-backend")]
#[command(about = "Chain-tip sync and history service backed by BlockCypher", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Override server host
    #[arg(long)]
    host: Option<String>,

    /// Override server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Override BlockCypher API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Override log format (json, text or auto)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config(Args::parse())?;
    config.validate().context("Invalid configuration")?;

    initialize_logging(config.log_format);

    info!("Starting Chain Sync Backend");
    info!("Server will run on {}:{}", config.host, config.port);

    let shutdown = CancellationToken::new();

    let postgres_client = create_postgres_client(&config).await?;
    let api_client = create_api_client(&config)?;
    let services = Services::new(postgres_client, api_client, shutdown.clone());

    // Start server
    let app = create_app(services);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .context("Failed to bind TCP listener")?;

    info!("Server listening on http://{}:{}", config.host, config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Resolve once ctrl-c is received, cancelling in-flight fetches
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }

    info!("Shutdown requested");
    shutdown.cancel();
}

fn load_config(args: Args) -> Result<Config> {
    let mut config = match args.config {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to read config file: {}", path))?,
        None => Config::default(),
    };

    // Apply CLI overrides
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = database_url;
    }
    if let Some(api_url) = args.api_url {
        config.blockcypher.base_url = api_url;
    }
    if let Some(log_format) = args.log_format {
        config.log_format = log_format;
    }

    Ok(config)
}

async fn create_postgres_client(config: &Config) -> Result<Arc<DBClient>> {
    #[cfg(feature = "mocks")]
    {
        if config.database.mock_mode {
            info!("Using mock repository (mock_mode enabled)");

            let client = DBClient::new(Arc::new(MockRepository::new()));

            // Test the connection (mock always succeeds)
            client
                .test_connection()
                .await
                .context("Failed to test mock connection")?;

            return Ok(Arc::new(client));
        }
    }

    let applied = migrations::run_pending(&config.database.url)
        .await
        .context("Failed to apply database migrations")?;
    debug!(applied, "Database migrations up to date");

    let repository = Repository::new(&config.database.url, config.database.tls_ca_file.as_deref())
        .await
        .context("Failed to create repository with database connection")?;

    let client = DBClient::new(Arc::new(repository));

    client
        .test_connection()
        .await
        .context("Failed to connect to PostgreSQL")?;

    info!("Connected to PostgreSQL database");
    Ok(Arc::new(client))
}

fn create_api_client(config: &Config) -> Result<Arc<BlockCypherClient>> {
    let timeout = Duration::from_secs(
        config
            .blockcypher
            .timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    );

    #[cfg(feature = "mocks")]
    {
        if config.blockcypher.mock_mode {
            info!("Using mock BlockCypher connection (mock_mode enabled)");

            let conn = AnyApiConnection::Mock(MockConnection::new());
            return Ok(Arc::new(BlockCypherClient::new(Arc::new(conn), timeout)));
        }
    }

    let api_config = ApiConfig {
        base_url: config.blockcypher.base_url.clone(),
        timeout_secs: config.blockcypher.timeout_secs,
    };

    let http_conn = HttpConnection::new(&api_config).context("Failed to create HTTP client")?;
    let conn = AnyApiConnection::Real(http_conn);

    info!(base_url = %api_config.base_url, "Using BlockCypher API");
    Ok(Arc::new(BlockCypherClient::new(Arc::new(conn), timeout)))
}
