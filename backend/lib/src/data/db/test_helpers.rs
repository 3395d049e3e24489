use diesel::prelude::*;
use diesel_migrations::MigrationHarness;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

use crate::data::db::migrations::MIGRATIONS;

/// Setup a database instance (thru a container) with every migration applied
///
/// The container is stopped when the returned handle is dropped
pub async fn setup_test_db() -> (ContainerAsync<Postgres>, String) {
    let container = Postgres::default()
        .with_db_name("chain_sync")
        .with_user("postgres")
        .with_password("postgres")
        .with_tag("15")
        .start()
        .await
        .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/chain_sync", host, port);

    let mut conn =
        diesel::PgConnection::establish(&database_url).expect("Failed to connect for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");

    (container, database_url)
}
