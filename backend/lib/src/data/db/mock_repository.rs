//! Mock repository implementation for unit testing.
//!
//! Provides an in-memory implementation of the repository pattern that mimics
//! database operations without requiring a real database connection.

use std::{
    cmp::Reverse,
    sync::{
        atomic::{AtomicBool, AtomicI64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::data::db::repository::{
    error::{RepositoryError, RepositoryResult},
    validate_window, SyncedRecordOps, WriteScope,
};
use crate::models::{NewSyncedRecord, SyncedRecord};

/// Mock repository implementation using in-memory storage
///
/// Cloning yields a handle to the same storage, so tests can keep one
/// around to inspect or to inject failures after handing the repository out.
#[derive(Clone)]
pub struct MockRepository {
    records: Arc<RwLock<Vec<SyncedRecord>>>,
    next_id: Arc<AtomicI64>,
    fail_commits: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl MockRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            fail_commits: Arc::new(AtomicBool::new(false)),
            fail_reads: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent commit fail, discarding what was staged
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent read (and connection test) fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of stored records, bypassing failure injection
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    fn check_reads(&self) -> RepositoryResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::pool("mock repository is unreachable"));
        }
        Ok(())
    }

    /// Records matching the filter, in history order
    async fn matching(&self, blockchain_type: Option<&str>) -> Vec<SyncedRecord> {
        let records = self.records.read().await;
        let mut matching: Vec<SyncedRecord> = records
            .iter()
            .filter(|r| blockchain_type.map_or(true, |t| r.blockchain_type == t))
            .cloned()
            .collect();
        matching.sort_by_key(|r| (Reverse(r.created_at), r.id));
        matching
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

struct MockWriteScope {
    repository: MockRepository,
    staged: Vec<NewSyncedRecord>,
}

#[async_trait]
impl WriteScope for MockWriteScope {
    fn add(&mut self, record: NewSyncedRecord) {
        self.staged.push(record);
    }

    async fn commit(&mut self) -> RepositoryResult<Vec<SyncedRecord>> {
        let staged = std::mem::take(&mut self.staged);

        if self.repository.fail_commits.load(Ordering::SeqCst) {
            return Err(RepositoryError::transaction("injected commit failure"));
        }

        // single write lock so the whole batch lands at once
        let mut records = self.repository.records.write().await;
        let stored: Vec<SyncedRecord> = staged
            .into_iter()
            .map(|record| record.into_record(self.repository.next_id.fetch_add(1, Ordering::SeqCst)))
            .collect();
        records.extend(stored.iter().cloned());

        Ok(stored)
    }
}

#[async_trait]
impl SyncedRecordOps for MockRepository {
    async fn begin(&self) -> RepositoryResult<Box<dyn WriteScope>> {
        Ok(Box::new(MockWriteScope {
            repository: self.clone(),
            staged: Vec::new(),
        }))
    }

    async fn count_records(&self, blockchain_type: Option<&str>) -> RepositoryResult<i64> {
        self.check_reads()?;
        Ok(self.matching(blockchain_type).await.len() as i64)
    }

    async fn list_records(
        &self,
        blockchain_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<SyncedRecord>> {
        self.check_reads()?;
        validate_window(limit, offset)?;

        Ok(self
            .matching(blockchain_type)
            .await
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn test_connection(&self) -> RepositoryResult<()> {
        self.check_reads()
    }
}
