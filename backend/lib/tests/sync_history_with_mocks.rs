//! End-to-end flows through the HTTP API over the mock repository and connection

#![cfg(feature = "mocks")]

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use chain_sync_backend_lib::{
    api::create_app,
    constants::mocks::{MOCK_HASH, MOCK_HEIGHT},
    data::{
        blockcypher::{ErrorMode, MockConnection},
        db::mock_repository::MockRepository,
    },
    models::NetworkId,
    services::Services,
};

const LTC_BODY: &str = r#"{"name":"LTC.main","height":2500000,"hash":"4ad1f3e9b2f9a1c6e6f8b1f1d0f0c1d2e3f4a5b6c7d8e9f0a1b2c3d4e5f6a7b8","time":"2023-07-24T03:50:00Z","peer_count":12,"unconfirmed_count":34,"high_fee_per_kb":21000,"medium_fee_per_kb":15000,"low_fee_per_kb":10000}"#;

fn server(repository: MockRepository, connection: MockConnection) -> TestServer {
    TestServer::new(create_app(Services::mocks_with(repository, connection))).unwrap()
}

async fn history(server: &TestServer, path: &str, page_number: i64, page_size: i64) -> Value {
    let response = server
        .get(path)
        .add_query_param("pageNumber", page_number)
        .add_query_param("pageSize", page_size)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json()
}

#[tokio::test]
async fn repeated_syncs_build_a_newest_first_history() {
    let connection = MockConnection::new();
    connection.set_response("ltc/main", LTC_BODY).await;
    let server = server(MockRepository::new(), connection);

    let mut ids = Vec::new();
    for _ in 0..3 {
        let response = server.post("/api/blockchain/sync/LTC").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let json: Value = response.json();
        assert_eq!(json["data"]["rawJson"], LTC_BODY);
        ids.push(json["data"]["id"].as_i64().unwrap());
    }

    let first_page = history(&server, "/api/blockchain/LTC/history", 1, 2).await;
    let items = first_page["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(first_page["totalCount"], 3);
    assert_eq!(first_page["totalPages"], 2);
    assert_eq!(first_page["hasNextPage"], true);
    assert_eq!(first_page["hasPreviousPage"], false);

    let second_page = history(&server, "/api/blockchain/LTC/history", 2, 2).await;
    assert_eq!(second_page["items"].as_array().unwrap().len(), 1);
    assert_eq!(second_page["hasNextPage"], false);

    // every record shows up exactly once across the pages
    let mut seen: Vec<i64> = items
        .iter()
        .chain(second_page["items"].as_array().unwrap())
        .map(|item| item["id"].as_i64().unwrap())
        .collect();
    seen.sort();
    assert_eq!(seen, ids);
}

#[tokio::test]
async fn sync_all_populates_every_network() {
    let repository = MockRepository::new();
    let server = server(repository.clone(), MockConnection::new());

    let response = server.post("/api/blockchain/sync-all").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["count"], NetworkId::ALL.len());
    assert_eq!(json["failed"], 0);

    for network in NetworkId::ALL {
        let path = format!("/api/blockchain/{network}/history");
        let page = history(&server, &path, 1, 10).await;
        assert_eq!(page["totalCount"], 1);
        assert_eq!(page["items"][0]["blockchainType"], network.as_str());
        assert_eq!(page["items"][0]["height"], MOCK_HEIGHT);
        assert_eq!(page["items"][0]["hash"], MOCK_HASH);
    }

    let all = history(&server, "/api/blockchain/all-history", 1, 50).await;
    assert_eq!(all["totalCount"], 5);
    assert_eq!(repository.len().await, 5);
}

#[tokio::test]
async fn failures_leave_no_trace() {
    let repository = MockRepository::new();
    let connection = MockConnection::new();
    let server = server(repository.clone(), connection.clone());

    connection.set_error_mode(ErrorMode::Status(502)).await;
    let response = server.post("/api/blockchain/sync/BTC").await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);

    connection.set_error_mode(ErrorMode::None).await;
    repository.set_fail_commits(true);
    let response = server.post("/api/blockchain/sync/BTC").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    repository.set_fail_commits(false);
    let page = history(&server, "/api/blockchain/BTC/history", 1, 10).await;
    assert_eq!(page["totalCount"], 0);
    assert!(page["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn pages_past_the_end_are_empty() {
    let server = server(MockRepository::new(), MockConnection::new());
    server.post("/api/blockchain/sync/DASH").await;

    let page = history(&server, "/api/blockchain/DASH/history", 4, 10).await;

    assert!(page["items"].as_array().unwrap().is_empty());
    assert_eq!(page["hasNextPage"], false);
    assert_eq!(page["hasPreviousPage"], true);
    assert_eq!(page["totalCount"], 1);
}
