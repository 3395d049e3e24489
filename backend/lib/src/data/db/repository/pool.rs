//! SmartPool implementation for automatic test transaction management.
//!
//! ## Key Components
//! - [`SmartPool`] - Connection pool with automatic test transaction support
//!
//! ## Features
//! - Automatic test transactions in test mode (single connection)
//! - Normal pooling over TLS in production mode

#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(not(test))]
use {
    crate::constants::database::{
        POOL_CONNECTION_TIMEOUT_SECS, POOL_IDLE_TIMEOUT_SECS, POOL_MAX_LIFETIME_SECS,
        POOL_MAX_SIZE, POOL_MIN_IDLE,
    },
    diesel::{ConnectionError, ConnectionResult},
    diesel_async::pooled_connection::ManagerConfig,
    diesel_async::RunQueryDsl,
    futures::{future::BoxFuture, FutureExt},
    rustls::{version, ClientConfig, RootCertStore},
    rustls_pemfile::certs as load_pem_certs,
    rustls_platform_verifier::ConfigVerifierExt,
    std::{fs::File, io::BufReader, time::Duration},
    tracing::warn,
};

#[cfg(test)]
use diesel_async::AsyncConnection;
use diesel_async::{
    pooled_connection::{bb8::Pool, AsyncDieselConnectionManager},
    AsyncPgConnection,
};

use super::error::RepositoryError;

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConnection<'a> =
    diesel_async::pooled_connection::bb8::PooledConnection<'a, AsyncPgConnection>;

/// Smart connection pool that automatically manages test transactions.
///
/// In test mode:
/// - Uses single connection to enable test transactions
/// - Automatically begins test transaction on first connection
/// - Transaction automatically rolls back when test ends
///
/// In production mode:
/// - Uses normal connection pooling, connections are established over TLS
/// - No test transaction overhead
pub struct SmartPool {
    /// The underlying bb8 pool
    inner: Arc<DbPool>,

    /// Track whether test transaction has been initialized (test mode only)
    #[cfg(test)]
    test_tx_initialized: AtomicBool,
}

impl SmartPool {
    /// Create a new SmartPool with the given database URL.
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    /// * `tls_ca_file` - PEM bundle to trust instead of the platform verifier
    #[cfg_attr(test, allow(unused_variables))]
    pub async fn new(database_url: &str, tls_ca_file: Option<&str>) -> Result<Self, RepositoryError> {
        #[cfg(test)]
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

        #[cfg(not(test))]
        let manager = {
            let ca_file = tls_ca_file.map(str::to_owned);
            let mut manager_cfg = ManagerConfig::default();
            manager_cfg.custom_setup =
                Box::new(move |config: &str| establish_connection(config, ca_file.clone()));
            AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
                database_url,
                manager_cfg,
            )
        };

        #[cfg(test)]
        let pool = {
            // Single connection for test transactions
            Pool::builder()
                .max_size(1)
                .build(manager)
                .await
                .map_err(|e| RepositoryError::pool(format!("Failed to create test pool: {}", e)))?
        };

        #[cfg(not(test))]
        let pool = {
            let pool = Pool::builder()
                .max_size(POOL_MAX_SIZE)
                .connection_timeout(Duration::from_secs(POOL_CONNECTION_TIMEOUT_SECS))
                .idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
                .max_lifetime(Some(Duration::from_secs(POOL_MAX_LIFETIME_SECS)))
                .min_idle(Some(POOL_MIN_IDLE))
                .build(manager)
                .await
                .map_err(|e| {
                    RepositoryError::pool(format!("Failed to create production pool: {}", e))
                })?;

            // Surface connection/TLS errors at startup rather than on first request
            {
                let mut conn = pool.get().await.map_err(|e| {
                    RepositoryError::pool(format!("Failed to get connection: {}", e))
                })?;
                diesel::sql_query("SELECT 1")
                    .execute(&mut conn)
                    .await
                    .map_err(|e| RepositoryError::pool(format!("Healthcheck failed: {}", e)))?;
            }

            pool
        };

        Ok(Self {
            inner: Arc::new(pool),
            #[cfg(test)]
            test_tx_initialized: AtomicBool::new(false),
        })
    }

    /// Get a connection from the pool.
    ///
    /// In test mode, this will automatically begin a test transaction
    /// on the first call, which will be rolled back when the test ends.
    pub async fn get(&self) -> Result<DbConnection<'_>, RepositoryError> {
        #[allow(unused_mut)]
        let mut conn = self
            .inner
            .get()
            .await
            .map_err(|e| RepositoryError::pool(format!("Failed to get connection: {}", e)))?;

        #[cfg(test)]
        {
            if self
                .test_tx_initialized
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                conn.begin_test_transaction()
                    .await
                    .map_err(RepositoryError::Database)?;
            }
        }

        Ok(conn)
    }
}

// --- TLS setup and custom connection establishment ---

#[cfg(not(test))]
fn rustls_config_from_ca_file(path: &str) -> Result<ClientConfig, String> {
    let file = File::open(path).map_err(|e| format!("failed to open CA file: {e}"))?;
    let mut reader = BufReader::new(file);
    let certs = load_pem_certs(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("failed to parse PEM certs: {e}"))?;

    let mut roots = RootCertStore::empty();
    for cert in certs {
        if let Err(err) = roots.add(cert) {
            warn!(error = %err, "Failed to add certificate to root store");
        }
    }

    let provider = rustls::crypto::ring::default_provider();
    ClientConfig::builder_with_provider(provider.into())
        .with_protocol_versions(&[&version::TLS13, &version::TLS12])
        .map(|builder| builder.with_root_certificates(roots).with_no_client_auth())
        .map_err(|e| format!("invalid TLS configuration: {e}"))
}

#[cfg(not(test))]
fn make_rustls_config(ca_file: Option<&str>) -> ClientConfig {
    let Some(path) = ca_file else {
        return ClientConfig::with_platform_verifier();
    };

    rustls_config_from_ca_file(path).unwrap_or_else(|err| {
        warn!(path, error = %err, "Falling back to platform verifier");
        ClientConfig::with_platform_verifier()
    })
}

#[cfg(not(test))]
fn establish_connection(
    config: &str,
    ca_file: Option<String>,
) -> BoxFuture<'_, ConnectionResult<AsyncPgConnection>> {
    let fut = async move {
        let rustls_config = make_rustls_config(ca_file.as_deref());
        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(rustls_config);
        let (client, conn) = tokio_postgres::connect(config, tls)
            .await
            .map_err(|e| ConnectionError::BadConnection(e.to_string()))?;

        AsyncPgConnection::try_from_client_and_connection(client, conn).await
    };
    fut.boxed()
}
