//! Mock API connection implementation for testing
//!
//! Serves a canned snapshot for every chain endpoint, with per-path overrides
//! and error scenarios configurable at runtime.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::json;
use tokio::{
    sync::{Mutex, RwLock},
    time::sleep,
};

use crate::{
    constants::{
        blockcypher::TIMEOUT_MULTIPLIER,
        mocks::{MOCK_HASH, MOCK_HEIGHT, MOCK_PEER_COUNT, MOCK_PREVIOUS_HASH, MOCK_TIME},
    },
    data::blockcypher::{
        error::{FetchError, FetchResult},
        ApiConnection,
    },
};

/// Error simulation modes for testing
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorMode {
    /// No errors - all calls succeed
    None,
    /// Simulate a request timeout
    Timeout,
    /// Simulate transport error
    TransportError(String),
    /// Simulate a non-success HTTP status
    Status(u16),
    /// Answer with a body that is not a snapshot
    MalformedBody,
    /// Fail after N successful calls
    FailAfterNCalls(usize),
}

/// Mock API connection for testing
#[derive(Clone)]
pub struct MockConnection {
    /// Predefined bodies for specific paths
    responses: Arc<RwLock<HashMap<String, String>>>,
    /// Error simulation mode applied to every path
    error_mode: Arc<RwLock<ErrorMode>>,
    /// Error simulation modes applied to a single path
    path_errors: Arc<RwLock<HashMap<String, ErrorMode>>>,
    /// Whether the API is "reachable"
    reachable: Arc<RwLock<bool>>,
    /// Call counter for FailAfterNCalls mode
    call_count: Arc<Mutex<usize>>,
    /// Optional delay to simulate network latency
    latency_ms: Arc<RwLock<Option<u64>>>,
}

impl MockConnection {
    /// Create a new mock connection
    ///
    /// The mock connection will have no faults configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom body for a specific path
    pub async fn set_response(&self, path: &str, body: impl Into<String>) {
        let mut responses = self.responses.write().await;
        responses.insert(path.to_string(), body.into());
    }

    /// Set the error simulation mode
    pub async fn set_error_mode(&self, mode: ErrorMode) {
        let mut error_mode = self.error_mode.write().await;
        *error_mode = mode;

        // Reset call count when changing error mode
        let mut call_count = self.call_count.lock().await;
        *call_count = 0;
    }

    /// Set the error simulation mode of a single path
    pub async fn set_path_error(&self, path: &str, mode: ErrorMode) {
        let mut path_errors = self.path_errors.write().await;
        path_errors.insert(path.to_string(), mode);
    }

    /// Set network latency simulation
    pub async fn set_latency_ms(&self, latency: u64) {
        let mut latency_guard = self.latency_ms.write().await;
        *latency_guard = Some(latency);
    }

    /// Simulate the API going away
    pub async fn disconnect(&self) {
        let mut reachable = self.reachable.write().await;
        *reachable = false;
    }

    /// Simulate the API coming back
    pub async fn reconnect(&self) {
        let mut reachable = self.reachable.write().await;
        *reachable = true;
    }

    /// Check if we should simulate an error for `path` based on current modes
    async fn check_error(&self, path: &str) -> FetchResult<Option<String>> {
        let current_count = {
            let mut call_count = self.call_count.lock().await;
            *call_count += 1;
            *call_count
        };

        let path_mode = self.path_errors.read().await.get(path).cloned();
        let error_mode = match path_mode {
            Some(mode) => mode,
            None => self.error_mode.read().await.clone(),
        };

        match error_mode {
            ErrorMode::None => Ok(None),
            ErrorMode::Timeout => {
                // Simulate timeout by sleeping then returning error
                let latency = *self.latency_ms.read().await;
                if let Some(latency_ms) = latency {
                    sleep(Duration::from_millis(latency_ms * TIMEOUT_MULTIPLIER)).await;
                }
                Err(FetchError::Timeout)
            }
            ErrorMode::TransportError(msg) => Err(FetchError::Transport(msg)),
            ErrorMode::Status(status) => Err(FetchError::status(status, "simulated error")),
            ErrorMode::MalformedBody => Ok(Some("<html>not a snapshot</html>".to_string())),
            ErrorMode::FailAfterNCalls(n) => {
                if current_count > n {
                    Err(FetchError::Transport(
                        "Simulated failure after N calls".to_string(),
                    ))
                } else {
                    Ok(None)
                }
            }
        }
    }
}

impl Default for MockConnection {
    fn default() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            error_mode: Arc::new(RwLock::new(ErrorMode::None)),
            path_errors: Arc::new(RwLock::new(HashMap::new())),
            reachable: Arc::new(RwLock::new(true)),
            call_count: Arc::new(Mutex::new(0)),
            latency_ms: Arc::new(RwLock::new(None)),
        }
    }
}

/// Canned snapshot for a `{coin}/{chain}` path, named the way the API names chains
fn canned_snapshot(path: &str) -> String {
    let name = match path.split_once('/') {
        Some((coin, chain)) => format!("{}.{}", coin.to_uppercase(), chain),
        None => path.to_uppercase(),
    };

    json!({
        "name": name,
        "height": MOCK_HEIGHT,
        "hash": MOCK_HASH,
        "time": MOCK_TIME,
        "latest_url": format!("https://api.blockcypher.com/v1/{path}/blocks/{MOCK_HASH}"),
        "previous_hash": MOCK_PREVIOUS_HASH,
        "previous_url": format!("https://api.blockcypher.com/v1/{path}/blocks/{MOCK_PREVIOUS_HASH}"),
        "peer_count": MOCK_PEER_COUNT,
        "unconfirmed_count": 0,
        "high_fee_per_kb": 0,
        "medium_fee_per_kb": 0,
        "low_fee_per_kb": 0,
        "last_fork_height": MOCK_HEIGHT - 1,
        "last_fork_hash": MOCK_PREVIOUS_HASH,
    })
    .to_string()
}

#[async_trait]
impl ApiConnection for MockConnection {
    async fn get(&self, path: &str) -> FetchResult<String> {
        if !*self.reachable.read().await {
            return Err(FetchError::Transport("connection refused".to_string()));
        }

        let latency = *self.latency_ms.read().await;
        if let Some(latency_ms) = latency {
            sleep(Duration::from_millis(latency_ms)).await;
        }

        if let Some(body) = self.check_error(path).await? {
            return Ok(body);
        }

        let responses = self.responses.read().await;
        Ok(responses
            .get(path)
            .cloned()
            .unwrap_or_else(|| canned_snapshot(path)))
    }

    async fn is_reachable(&self) -> bool {
        *self.reachable.read().await
    }
}
