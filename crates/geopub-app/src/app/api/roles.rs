//! Role discovery endpoint.

use salvo::writing::Json;
use salvo::{Depot, Router, handler};

use geopub_core::constants::ROLES_ROUTE_COMPONENT;
use geopub_service::authz::{PgRoleStore, RolePolicy, RoleService};

use crate::config::get_config_from_depot;
use crate::db_handler::get_pool_from_depot;
use crate::error::{AppError, AppResult, write_app_error};

#[must_use]
pub fn routes() -> Router {
    Router::with_path(ROLES_ROUTE_COMPONENT).get(get_roles)
}

/// ## Summary
/// Lists all grantable role names, `EVERYONE` included (last).
#[handler]
#[tracing::instrument(skip_all)]
async fn get_roles(depot: &Depot, res: &mut salvo::Response) {
    match all_roles(depot).await {
        Ok(roles) => res.render(Json(roles)),
        Err(e) => write_app_error(res, &e),
    }
}

async fn all_roles(depot: &Depot) -> AppResult<Vec<String>> {
    let config = get_config_from_depot(depot)?;
    let pool = get_pool_from_depot(depot)?;

    let policy = RolePolicy::from_config(&config.role_service).map_err(AppError::from)?;
    let service = RoleService::new(PgRoleStore::new(pool.as_ref().clone()), policy);

    Ok(service.get_all_roles().await?)
}
