//! HTTP connection to the BlockCypher REST API, built on `reqwest`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::{
    constants::blockcypher::{DEFAULT_TIMEOUT_SECS, HEALTH_CHECK_TIMEOUT_SECS},
    data::blockcypher::{
        connection::ApiConfig,
        error::{FetchError, FetchResult, IntoFetchError},
        ApiConnection,
    },
};

/// Connection issuing plain HTTPS GETs against a base URL
pub struct HttpConnection {
    client: reqwest::Client,
    base_url: String,
    /// Host and port of the API, probed by [`ApiConnection::is_reachable`]
    authority: (String, u16),
}

impl HttpConnection {
    /// Build the underlying HTTP client from `config`
    pub fn new(config: &ApiConfig) -> FetchResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

        let url = Url::parse(&config.base_url)
            .map_err(|e| FetchError::Transport(format!("Invalid base URL: {}", e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| FetchError::Transport("Base URL has no host".to_string()))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| FetchError::Transport("Base URL has no port".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chain-sync-backend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authority: (host.to_string(), port),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl ApiConnection for HttpConnection {
    async fn get(&self, path: &str) -> FetchResult<String> {
        let url = self.url_for(path);
        debug!(target: "blockcypher::http::get", url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(IntoFetchError::into_fetch_error)?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(IntoFetchError::into_fetch_error)?;

        if !status.is_success() {
            warn!(target: "blockcypher::http::get", url = %url, status = status.as_u16(), "Non-success response");
            return Err(FetchError::status(
                status.as_u16(),
                &String::from_utf8_lossy(&body),
            ));
        }

        // the body is stored verbatim, so it must decode without replacement
        String::from_utf8(body.to_vec())
            .map_err(|e| FetchError::Schema(format!("Response body is not valid UTF-8: {}", e)))
    }

    /// TCP connect to the API host; no request is sent, so no rate-limit quota is used
    async fn is_reachable(&self) -> bool {
        let (host, port) = &self.authority;

        matches!(
            tokio::time::timeout(
                Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS),
                TcpStream::connect((host.as_str(), *port)),
            )
            .await,
            Ok(Ok(_))
        )
    }
}
