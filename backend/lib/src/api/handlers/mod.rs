use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::{
    error::Error,
    models::{NetworkId, SyncedRecord},
    services::{sync::NetworkSyncResult, Services},
};

pub mod pagination;

use pagination::PageParams;

// ==================== Health Handler ====================

pub async fn health_check(State(services): State<Services>) -> impl IntoResponse {
    let status = services.health.check_health().await;

    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(status))
}

// ==================== Sync Handlers ====================

/// Per-network entry of the sync-all response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSyncSummary {
    pub network: NetworkId,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SyncedRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<NetworkSyncResult> for NetworkSyncSummary {
    fn from(value: NetworkSyncResult) -> Self {
        match value.result {
            Ok(record) => Self {
                network: value.network,
                success: true,
                data: Some(record),
                error: None,
            },
            Err(e) => Self {
                network: value.network,
                success: false,
                data: None,
                error: Some(e.to_string()),
            },
        }
    }
}

pub async fn sync_network(
    State(services): State<Services>,
    Path(network): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let record = services.sync.sync_one_by_name(&network).await?;

    Ok(Json(json!({
        "message": format!("Successfully synced {}", record.blockchain_type),
        "data": record,
    })))
}

pub async fn sync_all(State(services): State<Services>) -> impl IntoResponse {
    let report = services.sync.sync_all().await;
    let (count, succeeded, failed) = (report.attempted, report.succeeded(), report.failed());
    let results: Vec<NetworkSyncSummary> = report.results.into_iter().map(Into::into).collect();

    Json(json!({
        "message": "All blockchains synced",
        "count": count,
        "succeeded": succeeded,
        "failed": failed,
        "results": results,
    }))
}

// ==================== History Handlers ====================

pub async fn network_history(
    State(services): State<Services>,
    Path(network): Path<String>,
    page: PageParams,
) -> Result<impl IntoResponse, Error> {
    let view = services
        .history
        .get_history_by_name(&network, page.page_number, page.page_size)
        .await?;

    Ok(Json(view))
}

pub async fn all_history(
    State(services): State<Services>,
    page: PageParams,
) -> Result<impl IntoResponse, Error> {
    let view = services
        .history
        .get_all_history(page.page_number, page.page_size)
        .await?;

    Ok(Json(view))
}
