//! API connection abstraction

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::blockcypher::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
#[cfg(feature = "mocks")]
use crate::data::blockcypher::mock_connection::MockConnection;
use crate::data::blockcypher::{error::FetchResult, http_connection::HttpConnection, ApiConnection};

/// Enum wrapper for different API connection implementations
///
/// Lets the client hold a concrete type while still switching between the
/// real HTTP connection and the mock one.
pub enum AnyApiConnection {
    /// Real HTTP connection
    Real(HttpConnection),

    /// Mock connection for testing
    #[cfg(feature = "mocks")]
    Mock(MockConnection),
}

impl Debug for AnyApiConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnyApiConnection::Real(_) => write!(f, "AnyApiConnection::Real(HttpConnection)"),
            #[cfg(feature = "mocks")]
            AnyApiConnection::Mock(_) => write!(f, "AnyApiConnection::Mock(MockConnection)"),
        }
    }
}

#[async_trait]
impl ApiConnection for AnyApiConnection {
    async fn get(&self, path: &str) -> FetchResult<String> {
        match self {
            AnyApiConnection::Real(conn) => conn.get(path).await,
            #[cfg(feature = "mocks")]
            AnyApiConnection::Mock(conn) => conn.get(path).await,
        }
    }

    async fn is_reachable(&self) -> bool {
        match self {
            AnyApiConnection::Real(conn) => conn.is_reachable().await,
            #[cfg(feature = "mocks")]
            AnyApiConnection::Mock(conn) => conn.is_reachable().await,
        }
    }
}

/// Configuration for API connections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}
