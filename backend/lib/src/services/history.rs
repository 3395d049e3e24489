//! Paginated, newest-first views over the sync history

use std::sync::Arc;

use tracing::debug;

use crate::{
    data::db::client::DBClient,
    error::Error,
    models::{NetworkId, PageRequest, PagedView, SyncedRecord},
};

/// Service answering history queries
#[derive(Clone)]
pub struct HistoryService {
    postgres: Arc<DBClient>,
}

impl HistoryService {
    pub fn new(postgres: Arc<DBClient>) -> Self {
        Self { postgres }
    }

    /// Get one page of the records of `network`, newest first
    pub async fn get_history(
        &self,
        network: NetworkId,
        page_number: i64,
        page_size: i64,
    ) -> Result<PagedView<SyncedRecord>, Error> {
        self.page(Some(network), page_number, page_size).await
    }

    /// Same as [`Self::get_history`], resolving `identifier` through the registry first
    pub async fn get_history_by_name(
        &self,
        identifier: &str,
        page_number: i64,
        page_size: i64,
    ) -> Result<PagedView<SyncedRecord>, Error> {
        let network = identifier.parse::<NetworkId>()?;
        self.get_history(network, page_number, page_size).await
    }

    /// Get one page of the records of every network, newest first
    pub async fn get_all_history(
        &self,
        page_number: i64,
        page_size: i64,
    ) -> Result<PagedView<SyncedRecord>, Error> {
        self.page(None, page_number, page_size).await
    }

    async fn page(
        &self,
        network: Option<NetworkId>,
        page_number: i64,
        page_size: i64,
    ) -> Result<PagedView<SyncedRecord>, Error> {
        let request = PageRequest::new(page_number, page_size)?;

        debug!(
            target: "history_service::page",
            network = network.map(|n| n.as_str()).unwrap_or("*"),
            page_number,
            page_size,
            "Querying history"
        );

        let total_count = self.postgres.count_records(network).await?;
        let items = self.postgres.list_records(network, &request).await?;

        Ok(PagedView::new(items, total_count, request))
    }
}
