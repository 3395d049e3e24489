//! Services module for the chain sync backend

pub mod health;
pub mod history;
pub mod sync;

use std::sync::Arc;
#[cfg(feature = "mocks")]
use std::time::Duration;

use tokio_util::sync::CancellationToken;

#[cfg(feature = "mocks")]
use crate::{
    constants::blockcypher::DEFAULT_TIMEOUT_SECS,
    data::{
        blockcypher::{AnyApiConnection, MockConnection},
        db::mock_repository::MockRepository,
    },
};
use crate::data::{blockcypher::BlockCypherClient, db::client::DBClient};

#[derive(Clone)]
pub struct Services {
    pub sync: Arc<sync::SyncService>,
    pub history: Arc<history::HistoryService>,
    pub health: Arc<health::HealthService>,
}

impl Services {
    /// Wire every service over the given storage and API clients
    pub fn new(
        postgres: Arc<DBClient>,
        api: Arc<BlockCypherClient>,
        shutdown: CancellationToken,
    ) -> Self {
        let sync = Arc::new(sync::SyncService::new(
            postgres.clone(),
            api.clone(),
            shutdown,
        ));
        let history = Arc::new(history::HistoryService::new(postgres.clone()));
        let health = Arc::new(health::HealthService::new(postgres, api));

        Self {
            sync,
            history,
            health,
        }
    }
}

#[cfg(feature = "mocks")]
impl Services {
    /// Create a test services struct with everything mocked
    pub fn mocks() -> Self {
        Self::mocks_with(MockRepository::new(), MockConnection::new())
    }

    /// Create a test services struct over the given mocks
    ///
    /// The mocks are shared handles: the caller can keep clones around to
    /// inject failures or inspect storage.
    pub fn mocks_with(repository: MockRepository, connection: MockConnection) -> Self {
        let postgres = Arc::new(DBClient::new(Arc::new(repository)));
        let api = Arc::new(BlockCypherClient::new(
            Arc::new(AnyApiConnection::Mock(connection)),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        ));

        Self::new(postgres, api, CancellationToken::new())
    }
}
