mod publication;
mod roles;

use salvo::Router;

use crate::middleware::{actor::ActorMiddleware, authz::AuthzMiddleware};

// Re-export route constants from core
pub use geopub_core::constants::{
    REST_ROUTE_COMPONENT, REST_ROUTE_PREFIX, ROLES_ROUTE_COMPONENT, WORKSPACES_ROUTE_COMPONENT,
    WORKSPACES_ROUTE_PREFIX,
};

/// ## Summary
/// Constructs the main API router.
///
/// Every route runs behind the actor middleware; the workspace-publication
/// subtree additionally runs behind the authorization middleware.
#[must_use]
pub fn routes() -> Router {
    Router::with_path(REST_ROUTE_COMPONENT)
        .hoop(ActorMiddleware)
        .push(roles::routes())
        .push(
            Router::with_path(WORKSPACES_ROUTE_COMPONENT)
                .hoop(AuthzMiddleware)
                .push(publication::routes()),
        )
}
