//! Embedded schema migrations

use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use crate::data::db::repository::error::{RepositoryError, RepositoryResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every migration not yet recorded in the target database.
///
/// Runs on a blocking thread since diesel's migration harness is synchronous.
pub async fn run_pending(database_url: &str) -> RepositoryResult<usize> {
    let database_url = database_url.to_string();

    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url).map_err(|e| {
            RepositoryError::pool(format!("Failed to connect for migrations: {}", e))
        })?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| RepositoryError::transaction(format!("Failed to run migrations: {}", e)))?;

        for version in &applied {
            info!(%version, "Applied migration");
        }

        Ok(applied.len())
    })
    .await
    .map_err(|e| RepositoryError::transaction(format!("Migration task failed: {}", e)))?
}
