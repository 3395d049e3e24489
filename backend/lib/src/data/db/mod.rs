//! Sync history storage using repository pattern
//!
//! Records are written through a [`WriteScope`](repository::WriteScope) and
//! read back through [`DBClient`](client::DBClient), backed by either
//! PostgreSQL or an in-memory mock.

pub mod client;
pub mod migrations;
#[cfg(feature = "mocks")]
pub mod mock_repository;
pub mod repository;
pub mod schema;
#[cfg(test)]
pub mod test_helpers;
