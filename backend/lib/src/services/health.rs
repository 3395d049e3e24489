use std::sync::Arc;

use serde::Serialize;

use crate::{
    constants::server::SERVICE_NAME,
    data::{blockcypher::BlockCypherClient, db::client::DBClient},
};

pub const HEALTHY: &str = "healthy";
pub const UNHEALTHY: &str = "unhealthy";

#[derive(Debug, Serialize)]
pub struct DetailedHealthStatus {
    pub status: String,
    pub version: String,
    pub service: String,
    pub components: HealthComponents,
}

impl DetailedHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }
}

#[derive(Debug, Serialize)]
pub struct HealthComponents {
    pub postgres: ComponentHealth,
    pub blockcypher: ComponentHealth,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    fn healthy() -> Self {
        Self {
            status: HEALTHY.to_string(),
            message: None,
        }
    }

    fn unhealthy(message: String) -> Self {
        Self {
            status: UNHEALTHY.to_string(),
            message: Some(message),
        }
    }
}

pub struct HealthService {
    postgres: Arc<DBClient>,
    api: Arc<BlockCypherClient>,
}

impl HealthService {
    pub fn new(postgres: Arc<DBClient>, api: Arc<BlockCypherClient>) -> Self {
        Self { postgres, api }
    }

    pub async fn check_health(&self) -> DetailedHealthStatus {
        let (postgres_health, api_health) = tokio::join!(self.check_postgres(), self.check_api());

        let overall_status = if postgres_health.status == HEALTHY && api_health.status == HEALTHY {
            HEALTHY
        } else {
            UNHEALTHY
        };

        DetailedHealthStatus {
            status: overall_status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            service: SERVICE_NAME.to_string(),
            components: HealthComponents {
                postgres: postgres_health,
                blockcypher: api_health,
            },
        }
    }

    async fn check_postgres(&self) -> ComponentHealth {
        match self.postgres.test_connection().await {
            Ok(_) => ComponentHealth::healthy(),
            Err(e) => ComponentHealth::unhealthy(format!("Database error: {}", e)),
        }
    }

    async fn check_api(&self) -> ComponentHealth {
        match self.api.is_reachable().await {
            true => ComponentHealth::healthy(),
            false => ComponentHealth::unhealthy("BlockCypher API is not reachable".to_string()),
        }
    }
}
