use thiserror::Error;

use crate::constants::blockcypher::MAX_ERROR_BODY_CHARS;

/// Error type for chain snapshot fetches
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Network or transport-related errors
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not a valid snapshot
    #[error("Schema error: {0}")]
    Schema(String),

    /// Request timeout errors
    #[error("Request timeout")]
    Timeout,

    /// The fetch was abandoned because shutdown was requested
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Build a [`FetchError::Status`], keeping only the start of the body
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }
}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Trait for types that can be converted to fetch errors
pub trait IntoFetchError {
    /// Convert this error into a `FetchError`
    fn into_fetch_error(self) -> FetchError;
}

impl IntoFetchError for reqwest::Error {
    fn into_fetch_error(self) -> FetchError {
        if self.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = self.status() {
            FetchError::status(status.as_u16(), &self.to_string())
        } else if self.is_decode() {
            FetchError::Schema(self.to_string())
        } else {
            FetchError::Transport(self.to_string())
        }
    }
}

impl IntoFetchError for serde_json::Error {
    fn into_fetch_error(self) -> FetchError {
        FetchError::Schema(self.to_string())
    }
}
