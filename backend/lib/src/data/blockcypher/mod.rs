//! BlockCypher API client module

use async_trait::async_trait;

pub mod client;
pub mod connection;
pub mod error;
pub mod http_connection;
#[cfg(feature = "mocks")]
pub mod mock_connection;

pub use client::BlockCypherClient;
pub use connection::{AnyApiConnection, ApiConfig};
pub use error::{FetchError, FetchResult, IntoFetchError};
pub use http_connection::HttpConnection;
#[cfg(feature = "mocks")]
pub use mock_connection::{ErrorMode, MockConnection};

/// Trait for connections to the BlockCypher REST API
#[async_trait]
pub trait ApiConnection: Send + Sync {
    /// Issue a GET for `path`, relative to the API base URL, and return the body text
    async fn get(&self, path: &str) -> FetchResult<String>;

    /// Check whether the API host accepts connections, without spending request quota
    async fn is_reachable(&self) -> bool;
}
