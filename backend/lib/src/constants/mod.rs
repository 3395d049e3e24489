//! Configuration constants for the chain sync backend


/// Default server configuration
pub mod server {
    /// Default HTTP listening host
    pub const DEFAULT_HOST: &str = "127.0.0.1";

    /// Default HTTP server port
    pub const DEFAULT_PORT: u16 = 8080;

    /// Name reported by the health endpoint and the JSON log formatter
    pub const SERVICE_NAME: &str = "chain-sync-backend";
}

/// BlockCypher API client configuration
pub mod blockcypher {
    /// Default base URL of the BlockCypher v1 API
    pub const DEFAULT_BASE_URL: &str = "https://api.blockcypher.com/v1";

    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Timeout for the TCP connect issued by the health check
    pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

    /// Longest prefix of an error response body kept in a fetch error
    pub const MAX_ERROR_BODY_CHARS: usize = 256;

    /// Timeout multiplier for simulating network delays in mocks
    pub const TIMEOUT_MULTIPLIER: u64 = 10;
}

/// Database configuration
pub mod database {
    /// Default PostgreSQL database URL
    pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/chain_sync";

    /// Maximum number of pooled connections
    pub const POOL_MAX_SIZE: u32 = 32;

    /// Minimum number of idle pooled connections
    pub const POOL_MIN_IDLE: u32 = 4;

    /// Seconds to wait for a pooled connection before failing
    pub const POOL_CONNECTION_TIMEOUT_SECS: u64 = 15;

    /// Seconds before an idle pooled connection is closed
    pub const POOL_IDLE_TIMEOUT_SECS: u64 = 300;

    /// Seconds before a pooled connection is recycled
    pub const POOL_MAX_LIFETIME_SECS: u64 = 3600;
}

/// API configuration constants
pub mod api {
    /// Page number used when the request does not specify one
    pub const DEFAULT_PAGE_NUMBER: i64 = 1;

    /// Page size used when the request does not specify one
    pub const DEFAULT_PAGE_SIZE: i64 = 50;

    /// Largest page size a caller may request
    pub const MAX_PAGE_SIZE: i64 = 1000;
}

/// Canned values served by the mock API connection
pub mod mocks {
    /// Block height reported by every canned snapshot
    pub const MOCK_HEIGHT: i64 = 840_000;

    /// Tip hash reported by every canned snapshot
    pub const MOCK_HASH: &str = "0000000000000000000320283a032748cef8227873ff4872689bf23f1cda83a5";

    /// Previous block hash reported by every canned snapshot
    pub const MOCK_PREVIOUS_HASH: &str =
        "0000000000000000000172014ba58d66455762add0512355ad651207918494ab";

    /// Tip timestamp reported by every canned snapshot
    pub const MOCK_TIME: &str = "2024-04-20T00:09:27.000000Z";

    /// Peer count reported by every canned snapshot
    pub const MOCK_PEER_COUNT: i32 = 250;
}
