//! Database client wrapper using repository pattern abstraction
//!
//! This module provides a database client that delegates all operations
//! to an underlying repository implementation, allowing for both production
//! PostgreSQL and mock implementations for testing.

use std::sync::Arc;

use crate::{
    data::db::repository::{SyncedRecordOps, WriteScope},
    error::{Error, Result},
    models::{NetworkId, NewSyncedRecord, PageRequest, SyncedRecord},
};

/// Database client that delegates to a repository implementation
///
/// ## Usage Example
/// ```ignore
/// use data::db::{client::DBClient, repository::postgres::Repository};
///
/// // Production usage with PostgreSQL
/// let repo = Repository::new(&database_url, None).await?;
/// let client = DBClient::new(Arc::new(repo));
///
/// // Test usage with mock
/// let client = DBClient::new(Arc::new(MockRepository::new()));
/// ```
#[derive(Clone)]
pub struct DBClient {
    repository: Arc<dyn SyncedRecordOps>,
}

impl DBClient {
    /// Create a new database client with the given repository
    pub fn new(repository: Arc<dyn SyncedRecordOps>) -> Self {
        Self { repository }
    }

    /// Test the database connection
    pub async fn test_connection(&self) -> Result<()> {
        self.repository.test_connection().await?;
        Ok(())
    }

    /// Open a write scope for staging records
    pub async fn begin(&self) -> Result<Box<dyn WriteScope>> {
        Ok(self.repository.begin().await?)
    }

    /// Persist a single record in its own write scope
    pub async fn insert_record(&self, record: NewSyncedRecord) -> Result<SyncedRecord> {
        let mut scope = self.begin().await?;
        scope.add(record);

        scope
            .commit()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Persistence("commit returned no stored record".to_string()))
    }

    /// Count the stored records of `network`, or of every network
    pub async fn count_records(&self, network: Option<NetworkId>) -> Result<i64> {
        Ok(self
            .repository
            .count_records(network.as_ref().map(NetworkId::as_str))
            .await?)
    }

    /// Get one page of the stored records of `network`, or of every network
    pub async fn list_records(
        &self,
        network: Option<NetworkId>,
        page: &PageRequest,
    ) -> Result<Vec<SyncedRecord>> {
        Ok(self
            .repository
            .list_records(
                network.as_ref().map(NetworkId::as_str),
                page.page_size(),
                page.offset(),
            )
            .await?)
    }
}
