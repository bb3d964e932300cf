//! Embedded schema migrations.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{DbError, DbResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// ## Summary
/// Runs all pending migrations against the database.
///
/// Uses a dedicated blocking connection; diesel migration harnesses are
/// synchronous.
///
/// ## Errors
/// Returns `MigrationError` if the connection cannot be established or a
/// migration fails.
pub async fn run_pending(database_url: &str) -> DbResult<()> {
    let url = database_url.to_string();

    tokio::task::spawn_blocking(move || {
        use diesel::Connection;

        let mut conn = diesel::PgConnection::establish(&url)
            .map_err(|e| DbError::MigrationError(e.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::MigrationError(e.to_string()))?;

        tracing::info!(count = applied.len(), "Applied pending migrations");
        Ok(())
    })
    .await
    .map_err(|e| DbError::MigrationError(e.to_string()))?
}
