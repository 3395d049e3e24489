//! BlockCypher client implementation

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    data::blockcypher::{
        error::{FetchError, FetchResult, IntoFetchError},
        AnyApiConnection, ApiConnection,
    },
    models::{FetchedSnapshot, NetworkId},
};

/// Typed client over an [`AnyApiConnection`]
pub struct BlockCypherClient {
    connection: Arc<AnyApiConnection>,
    timeout: Duration,
}

impl BlockCypherClient {
    /// Create a new client; every fetch is bounded by `timeout`
    pub fn new(connection: Arc<AnyApiConnection>, timeout: Duration) -> Self {
        Self {
            connection,
            timeout,
        }
    }

    pub async fn is_reachable(&self) -> bool {
        self.connection.is_reachable().await
    }

    /// Fetch the current chain-tip snapshot of `network`.
    ///
    /// Single attempt, no retries. Resolves to [`FetchError::Timeout`] once
    /// the timeout elapses and to [`FetchError::Cancelled`] as soon as
    /// `cancel` fires, whichever comes first.
    pub async fn fetch_snapshot(
        &self,
        network: NetworkId,
        cancel: &CancellationToken,
    ) -> FetchResult<FetchedSnapshot> {
        debug!(
            target: "blockcypher::client::fetch_snapshot",
            network = %network,
            path = network.endpoint_path(),
            "Fetching chain tip"
        );

        let request = tokio::time::timeout(self.timeout, self.connection.get(network.endpoint_path()));

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            result = request => result.map_err(|_| FetchError::Timeout)??,
        };

        FetchedSnapshot::from_body(body).map_err(IntoFetchError::into_fetch_error)
    }
}

#[cfg(all(test, feature = "mocks"))]
mod tests {
    use super::*;
    use crate::{
        constants::{
            mocks::{MOCK_HASH, MOCK_HEIGHT},
            test::{btc, malformed},
        },
        data::blockcypher::{ErrorMode, MockConnection},
    };

    fn client_with(conn: MockConnection, timeout: Duration) -> BlockCypherClient {
        BlockCypherClient::new(Arc::new(AnyApiConnection::Mock(conn)), timeout)
    }

    #[tokio::test]
    async fn fetches_and_parses_snapshot() {
        let client = client_with(MockConnection::new(), Duration::from_secs(30));

        let fetched = client
            .fetch_snapshot(NetworkId::Ltc, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(fetched.snapshot.name, "LTC.main");
        assert_eq!(fetched.snapshot.height, MOCK_HEIGHT);
        assert_eq!(fetched.snapshot.hash, MOCK_HASH);
    }

    #[tokio::test]
    async fn keeps_raw_body() {
        let conn = MockConnection::new();
        conn.set_response("btc/main", btc::BODY).await;
        let client = client_with(conn, Duration::from_secs(30));

        let fetched = client
            .fetch_snapshot(NetworkId::Btc, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(fetched.raw_body, btc::BODY);
    }

    #[tokio::test]
    async fn malformed_bodies_are_schema_errors() {
        let conn = MockConnection::new();
        conn.set_response("ltc/main", malformed::MISSING_FIELDS).await;
        conn.set_path_error("dash/main", ErrorMode::MalformedBody).await;
        let client = client_with(conn, Duration::from_secs(30));
        let cancel = CancellationToken::new();

        assert!(matches!(
            client.fetch_snapshot(NetworkId::Ltc, &cancel).await,
            Err(FetchError::Schema(_))
        ));
        assert!(matches!(
            client.fetch_snapshot(NetworkId::Dash, &cancel).await,
            Err(FetchError::Schema(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_responses_time_out() {
        let conn = MockConnection::new();
        conn.set_latency_ms(60_000).await;
        let client = client_with(conn, Duration::from_secs(30));

        let result = client
            .fetch_snapshot(NetworkId::Eth, &CancellationToken::new())
            .await;

        assert_eq!(result, Err(FetchError::Timeout));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_in_flight_fetch() {
        let conn = MockConnection::new();
        conn.set_latency_ms(10_000).await;
        let client = client_with(conn, Duration::from_secs(30));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let result = client.fetch_snapshot(NetworkId::Btc, &cancel).await;
        assert_eq!(result, Err(FetchError::Cancelled));
    }

    #[tokio::test]
    async fn already_cancelled_token_skips_the_request() {
        let conn = MockConnection::new();
        conn.set_error_mode(ErrorMode::FailAfterNCalls(0)).await;
        let client = client_with(conn, Duration::from_secs(30));
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(
            client.fetch_snapshot(NetworkId::Btc, &cancel).await,
            Err(FetchError::Cancelled)
        );
    }
}
