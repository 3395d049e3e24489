//! Route definitions for the chain sync API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::services::Services;

/// Creates the router with all API routes
pub fn routes(services: Services) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(handlers::health_check))
        // Sync endpoints
        .route("/api/blockchain/sync-all", post(handlers::sync_all))
        .route("/api/blockchain/sync/{network}", post(handlers::sync_network))
        // History endpoints
        .route("/api/blockchain/all-history", get(handlers::all_history))
        .route(
            "/api/blockchain/{network}/history",
            get(handlers::network_history),
        )
        .with_state(services)
}
