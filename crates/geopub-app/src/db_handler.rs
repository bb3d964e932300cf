use std::sync::Arc;

use salvo::async_trait;

use crate::error::AppResult;
use geopub_core::error::CoreError;
use geopub_db::db::connection::DbPool;

/// Makes the connection pool available to handlers through the depot.
pub struct DbPoolHandler {
    pub pool: DbPool,
}

#[async_trait]
impl salvo::Handler for DbPoolHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        let pool: Arc<DbPool> = Arc::new(self.pool.clone());
        depot.inject(pool);
    }
}

/// ## Summary
/// Retrieves the connection pool from the depot.
///
/// ## Errors
/// Returns an error if the pool is not found in the depot.
pub fn get_pool_from_depot(depot: &salvo::Depot) -> AppResult<Arc<DbPool>> {
    depot
        .obtain::<Arc<DbPool>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Database pool not found in depot").into())
}
