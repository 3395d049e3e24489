//! Chain Sync Backend Library
//!
//! Pulls chain-tip snapshots from the BlockCypher API for a fixed set of
//! networks, appends them to a PostgreSQL history and serves paginated views
//! of that history over HTTP.

pub mod api;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod log;
pub mod models;
pub mod services;

pub use api::create_app;
pub use config::Config;
pub use error::{Error, Result};
