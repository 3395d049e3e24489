use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::data::blockcypher::FetchError;
use crate::data::db::repository::error::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Invalid page request: {0}")]
    InvalidPageRequest(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<RepositoryError> for Error {
    fn from(value: RepositoryError) -> Self {
        Error::Persistence(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::UnknownNetwork(_) | Error::InvalidPageRequest(_) => StatusCode::BAD_REQUEST,
            Error::Fetch(FetchError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Error::Fetch(_) => StatusCode::BAD_GATEWAY,
            Error::Persistence(_) | Error::Config(_) | Error::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
