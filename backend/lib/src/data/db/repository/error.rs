//! Error types for repository operations.
//!
//! ## Key Components
//! - [`RepositoryError`] - Main error type for all repository operations

use thiserror::Error;

/// Main error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database operation error from diesel
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Connection pool error
    #[error("Pool error: {0}")]
    Pool(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Transaction(String),
}

impl RepositoryError {
    /// Create a new Pool error with the given message.
    pub fn pool(msg: impl Into<String>) -> Self {
        Self::Pool(msg.into())
    }

    /// Create a new InvalidInput error with the given message.
    ///
    /// # Arguments
    /// * `msg` - Description of what input was invalid
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Transaction error with the given message.
    ///
    /// # Arguments
    /// * `msg` - Description of the transaction problem
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }
}

/// Type alias for Results that may fail with RepositoryError
pub type RepositoryResult<T> = Result<T, RepositoryError>;
