//! Repository pattern implementation for the sync history store.
//!
//! ## Key Components
//! - [`SmartPool`](pool::SmartPool) - Connection pool with automatic test transaction support
//! - [`RepositoryError`](error::RepositoryError) - Error type for repository operations
//! - [`SyncedRecordOps`] - Trait defining all storage operations
//! - [`WriteScope`] - A unit of work whose staged records are committed atomically
//! - [`Repository`](postgres::Repository) - PostgreSQL implementation
//!
//! The store is append-only: records can be added and read back, never
//! updated or deleted.

use async_trait::async_trait;

use crate::models::{NewSyncedRecord, SyncedRecord};

pub mod error;
pub mod pool;
pub mod postgres;

use error::RepositoryResult;

/// A unit of work against the store.
///
/// Records are staged in memory with [`WriteScope::add`] and only become
/// visible once [`WriteScope::commit`] succeeds, all of them or none.
/// Dropping a scope without committing discards what was staged.
#[async_trait]
pub trait WriteScope: Send {
    /// Stage a record for insertion
    fn add(&mut self, record: NewSyncedRecord);

    /// Persist every staged record in a single transaction.
    ///
    /// # Returns
    /// * The stored records, with their assigned ids, in staging order
    async fn commit(&mut self) -> RepositoryResult<Vec<SyncedRecord>>;
}

/// Operations on the `blockchain_data` table.
///
/// ## Implementation Notes
/// - Reads are ordered by `created_at` descending, ties broken by `id` ascending
/// - `blockchain_type` filters are exact matches on the canonical network string
/// - Pagination is supported through `limit` and `offset` parameters
#[async_trait]
pub trait SyncedRecordOps: Send + Sync {
    /// Open a new write scope, independent from any other open scope
    async fn begin(&self) -> RepositoryResult<Box<dyn WriteScope>>;

    /// Count stored records, optionally restricted to one network.
    ///
    /// # Arguments
    /// * `blockchain_type` - Canonical network identifier to filter on, if any
    async fn count_records(&self, blockchain_type: Option<&str>) -> RepositoryResult<i64>;

    /// List stored records with pagination.
    ///
    /// # Arguments
    /// * `blockchain_type` - Canonical network identifier to filter on, if any
    /// * `limit` - Maximum number of results
    /// * `offset` - Number of results to skip
    async fn list_records(
        &self,
        blockchain_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<SyncedRecord>>;

    /// Check that the store can be reached
    async fn test_connection(&self) -> RepositoryResult<()>;
}

/// Reject negative pagination values before they reach a query
pub(crate) fn validate_window(limit: i64, offset: i64) -> RepositoryResult<()> {
    if limit < 0 {
        return Err(error::RepositoryError::invalid_input(format!(
            "limit must not be negative, got {limit}"
        )));
    }
    if offset < 0 {
        return Err(error::RepositoryError::invalid_input(format!(
            "offset must not be negative, got {offset}"
        )));
    }
    Ok(())
}
