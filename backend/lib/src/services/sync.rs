//! Chain-tip synchronization: fetch, map, persist

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    data::{blockcypher::BlockCypherClient, db::client::DBClient},
    error::Error,
    models::{NetworkId, NewSyncedRecord, SyncedRecord},
};

/// Source of the `created_at` timestamp given to new records
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Outcome of syncing a single network as part of [`SyncService::sync_all`]
#[derive(Debug)]
pub struct NetworkSyncResult {
    pub network: NetworkId,
    pub result: Result<SyncedRecord, Error>,
}

/// Aggregate outcome of [`SyncService::sync_all`]
#[derive(Debug)]
pub struct SyncAllReport {
    /// Number of networks a sync was attempted for
    pub attempted: usize,
    /// One entry per attempted network, in registry order
    pub results: Vec<NetworkSyncResult>,
}

impl SyncAllReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded()
    }
}

/// Service pulling chain-tip snapshots and appending them to the history
#[derive(Clone)]
pub struct SyncService {
    postgres: Arc<DBClient>,
    api: Arc<BlockCypherClient>,
    shutdown: CancellationToken,
    clock: Clock,
}

impl SyncService {
    /// Create a new sync service
    ///
    /// In-flight fetches are abandoned once `shutdown` is cancelled.
    pub fn new(
        postgres: Arc<DBClient>,
        api: Arc<BlockCypherClient>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            postgres,
            api,
            shutdown,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used to timestamp new records
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Sync the network named `identifier`.
    ///
    /// Unknown identifiers are rejected before any request is made.
    pub async fn sync_one_by_name(&self, identifier: &str) -> Result<SyncedRecord, Error> {
        let network = identifier.parse::<NetworkId>()?;
        self.sync_one(network).await
    }

    /// Fetch the current tip of `network` and store it as a new record.
    ///
    /// Single attempt. On failure nothing is stored.
    pub async fn sync_one(&self, network: NetworkId) -> Result<SyncedRecord, Error> {
        match self.fetch_and_store(network).await {
            Ok(record) => {
                info!(
                    target: "sync_service::sync_one",
                    network = %network,
                    height = record.height,
                    id = record.id,
                    "Synced chain tip"
                );
                Ok(record)
            }
            Err(e) => {
                error!(
                    target: "sync_service::sync_one",
                    network = %network,
                    error = %e,
                    "Failed to sync chain tip"
                );
                Err(e)
            }
        }
    }

    async fn fetch_and_store(&self, network: NetworkId) -> Result<SyncedRecord, Error> {
        let fetched = self.api.fetch_snapshot(network, &self.shutdown).await?;
        let record = NewSyncedRecord::from_snapshot(network, &fetched, (self.clock)());

        self.postgres.insert_record(record).await
    }

    /// Sync every registered network concurrently.
    ///
    /// Waits for every attempt; a failing network does not affect the others.
    pub async fn sync_all(&self) -> SyncAllReport {
        debug!(
            target: "sync_service::sync_all",
            networks = NetworkId::ALL.len(),
            "Starting sync of all networks"
        );

        let handles = NetworkId::ALL.into_iter().map(|network| {
            let service = self.clone();
            tokio::spawn(async move { service.sync_one(network).await })
        });
        let outcomes = join_all(handles).await;

        let results: Vec<NetworkSyncResult> = NetworkId::ALL
            .into_iter()
            .zip(outcomes)
            .map(|(network, joined)| NetworkSyncResult {
                network,
                result: joined.unwrap_or_else(|e| {
                    error!(
                        target: "sync_service::sync_all",
                        network = %network,
                        error = %e,
                        "Sync task did not complete"
                    );
                    Err(Error::Internal)
                }),
            })
            .collect();

        let report = SyncAllReport {
            attempted: results.len(),
            results,
        };

        debug!(
            target: "sync_service::sync_all",
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Finished sync of all networks"
        );

        report
    }
}

#[cfg(all(test, feature = "mocks"))]
mod tests {
    use std::{
        sync::atomic::{AtomicI64, Ordering},
        time::Duration,
    };

    use chrono::TimeZone;

    use super::*;
    use crate::{
        constants::{
            mocks::{MOCK_HASH, MOCK_HEIGHT},
            test::{btc, malformed},
        },
        data::{
            blockcypher::{AnyApiConnection, ErrorMode, FetchError, MockConnection},
            db::mock_repository::MockRepository,
        },
        models::PageRequest,
    };

    struct Harness {
        service: SyncService,
        repo: MockRepository,
        conn: MockConnection,
        db: Arc<DBClient>,
        shutdown: CancellationToken,
    }

    fn harness() -> Harness {
        let repo = MockRepository::new();
        let conn = MockConnection::new();
        let db = Arc::new(DBClient::new(Arc::new(repo.clone())));
        let api = Arc::new(BlockCypherClient::new(
            Arc::new(AnyApiConnection::Mock(conn.clone())),
            Duration::from_secs(30),
        ));
        let shutdown = CancellationToken::new();

        Harness {
            service: SyncService::new(db.clone(), api, shutdown.clone()),
            repo,
            conn,
            db,
            shutdown,
        }
    }

    /// Clock advancing one minute per reading
    fn ticking_clock() -> Clock {
        let ticks = Arc::new(AtomicI64::new(0));
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Arc::new(move || start + chrono::Duration::minutes(ticks.fetch_add(1, Ordering::SeqCst)))
    }

    #[tokio::test]
    async fn sync_one_stores_fetched_snapshot() {
        let h = harness();
        h.conn.set_response("btc/main", btc::BODY).await;

        let record = h.service.sync_one(NetworkId::Btc).await.unwrap();

        assert_eq!(record.blockchain_type, "BTC");
        assert_eq!(record.height, btc::HEIGHT);
        assert_eq!(record.hash, btc::HASH);
        assert_eq!(record.raw_json, btc::BODY);

        let page = PageRequest::new(1, 10).unwrap();
        let stored = h.db.list_records(Some(NetworkId::Btc), &page).await.unwrap();
        assert_eq!(stored, vec![record]);
    }

    #[tokio::test]
    async fn sync_uses_injected_clock() {
        let h = harness();
        let service = h.service.with_clock(ticking_clock());

        let first = service.sync_one(NetworkId::Ltc).await.unwrap();
        let second = service.sync_one(NetworkId::Ltc).await.unwrap();

        assert_eq!(second.created_at - first.created_at, chrono::Duration::minutes(1));
    }

    #[tokio::test]
    async fn unknown_identifier_fails_before_any_io() {
        let h = harness();
        // any request would fail with a transport error instead
        h.conn.disconnect().await;

        let err = h.service.sync_one_by_name("INVALID").await.unwrap_err();

        assert!(matches!(err, Error::UnknownNetwork(ref id) if id == "INVALID"));
        assert_eq!(h.repo.len().await, 0);
    }

    #[tokio::test]
    async fn sync_one_by_name_resolves_identifier() {
        let h = harness();

        let record = h.service.sync_one_by_name("BTC_TEST3").await.unwrap();

        assert_eq!(record.blockchain_type, "BTC_TEST3");
        assert_eq!(record.name, "BTC.test3");
    }

    #[tokio::test]
    async fn fetch_failures_store_nothing() {
        let h = harness();
        h.conn.set_error_mode(ErrorMode::Status(500)).await;

        let err = h.service.sync_one(NetworkId::Eth).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Fetch(FetchError::Status { status: 500, .. })
        ));
        assert_eq!(h.repo.len().await, 0);
    }

    #[tokio::test]
    async fn schema_failures_store_nothing() {
        let h = harness();
        h.conn.set_response("dash/main", malformed::MISSING_FIELDS).await;

        let err = h.service.sync_one(NetworkId::Dash).await.unwrap_err();

        assert!(matches!(err, Error::Fetch(FetchError::Schema(_))));
        assert_eq!(h.repo.len().await, 0);
    }

    #[tokio::test]
    async fn commit_failures_store_nothing() {
        let h = harness();
        h.repo.set_fail_commits(true);

        let err = h.service.sync_one(NetworkId::Btc).await.unwrap_err();

        assert!(matches!(err, Error::Persistence(_)));
        assert_eq!(h.repo.len().await, 0);
    }

    #[tokio::test]
    async fn shutdown_cancels_sync() {
        let h = harness();
        h.shutdown.cancel();

        let err = h.service.sync_one(NetworkId::Btc).await.unwrap_err();

        assert!(matches!(err, Error::Fetch(FetchError::Cancelled)));
        assert_eq!(h.repo.len().await, 0);
    }

    #[tokio::test]
    async fn sync_all_attempts_every_network() {
        let h = harness();

        let report = h.service.sync_all().await;

        assert_eq!(report.attempted, NetworkId::ALL.len());
        assert_eq!(report.results.len(), NetworkId::ALL.len());
        assert_eq!(report.succeeded(), NetworkId::ALL.len());
        for (result, network) in report.results.iter().zip(NetworkId::ALL) {
            assert_eq!(result.network, network);
            let record = result.result.as_ref().unwrap();
            assert_eq!(record.blockchain_type, network.as_str());
            assert_eq!(record.height, MOCK_HEIGHT);
            assert_eq!(record.hash, MOCK_HASH);
        }
        assert_eq!(h.repo.len().await, NetworkId::ALL.len());
    }

    #[tokio::test]
    async fn sync_all_isolates_failures() {
        let h = harness();
        h.conn
            .set_path_error("dash/main", ErrorMode::TransportError("reset".to_string()))
            .await;

        let report = h.service.sync_all().await;

        assert_eq!(report.attempted, 5);
        assert_eq!(report.succeeded(), 4);
        assert_eq!(report.failed(), 1);

        let dash = report
            .results
            .iter()
            .find(|r| r.network == NetworkId::Dash)
            .unwrap();
        assert!(matches!(dash.result, Err(Error::Fetch(FetchError::Transport(_)))));

        assert_eq!(h.db.count_records(Some(NetworkId::Dash)).await.unwrap(), 0);
        assert_eq!(h.db.count_records(None).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn sync_all_reports_every_failure() {
        let h = harness();
        h.repo.set_fail_commits(true);

        let report = h.service.sync_all().await;

        assert_eq!(report.attempted, 5);
        assert_eq!(report.failed(), 5);
        assert!(report
            .results
            .iter()
            .all(|r| matches!(r.result, Err(Error::Persistence(_)))));
    }
}
