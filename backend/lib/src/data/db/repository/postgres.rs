//! PostgreSQL repository implementation.
//!
//! This module provides the production repository implementation using
//! PostgreSQL as the backing database through diesel-async.
//!
//! ## Features
//! - Connection pooling through SmartPool
//! - Automatic test transactions in test mode
//! - One database transaction per committed write scope

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::data::db::{
    repository::{
        error::{RepositoryError, RepositoryResult},
        pool::SmartPool,
        validate_window, SyncedRecordOps, WriteScope,
    },
    schema::blockchain_data,
};
use crate::models::{NewSyncedRecord, SyncedRecord};

/// PostgreSQL repository implementation.
pub struct Repository {
    pool: Arc<SmartPool>,
}

impl Repository {
    /// Create a new Repository with the given database URL.
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    /// * `tls_ca_file` - Optional PEM bundle used to verify the server
    pub async fn new(database_url: &str, tls_ca_file: Option<&str>) -> RepositoryResult<Self> {
        Ok(Self {
            pool: Arc::new(SmartPool::new(database_url, tls_ca_file).await?),
        })
    }
}

/// Write scope that stages rows in memory and inserts them on commit
struct PgWriteScope {
    pool: Arc<SmartPool>,
    staged: Vec<NewSyncedRecord>,
}

#[async_trait]
impl WriteScope for PgWriteScope {
    fn add(&mut self, record: NewSyncedRecord) {
        self.staged.push(record);
    }

    async fn commit(&mut self) -> RepositoryResult<Vec<SyncedRecord>> {
        let rows = std::mem::take(&mut self.staged);
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut pooled = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut pooled;

        conn.transaction(move |conn| {
            async move {
                let stored = diesel::insert_into(blockchain_data::table)
                    .values(&rows)
                    .returning(SyncedRecord::as_returning())
                    .get_results(conn)
                    .await?;

                Ok::<_, RepositoryError>(stored)
            }
            .scope_boxed()
        })
        .await
    }
}

#[async_trait]
impl SyncedRecordOps for Repository {
    async fn begin(&self) -> RepositoryResult<Box<dyn WriteScope>> {
        Ok(Box::new(PgWriteScope {
            pool: Arc::clone(&self.pool),
            staged: Vec::new(),
        }))
    }

    async fn count_records(&self, blockchain_type: Option<&str>) -> RepositoryResult<i64> {
        let mut conn = self.pool.get().await?;

        let count: i64 = match blockchain_type {
            Some(network) => {
                blockchain_data::table
                    .filter(blockchain_data::blockchain_type.eq(network))
                    .count()
                    .get_result(&mut *conn)
                    .await?
            }
            None => {
                blockchain_data::table
                    .count()
                    .get_result(&mut *conn)
                    .await?
            }
        };

        Ok(count)
    }

    async fn list_records(
        &self,
        blockchain_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<SyncedRecord>> {
        validate_window(limit, offset)?;

        let mut conn = self.pool.get().await?;

        let mut query = blockchain_data::table.into_boxed();
        if let Some(network) = blockchain_type {
            query = query.filter(blockchain_data::blockchain_type.eq(network));
        }

        let results = query
            .order((blockchain_data::created_at.desc(), blockchain_data::id.asc()))
            .limit(limit)
            .offset(offset)
            .select(SyncedRecord::as_select())
            .load(&mut *conn)
            .await?;

        Ok(results)
    }

    async fn test_connection(&self) -> RepositoryResult<()> {
        let mut conn = self.pool.get().await?;

        diesel::sql_query("SELECT 1").execute(&mut *conn).await?;

        Ok(())
    }
}
