//! Request authorization middleware.
//!
//! The publication routes are wrapped by this handler the way the original
//! platform wrapped its REST views with an authorization decorator: the
//! path is parsed into publication coordinates, the decision tree runs, and
//! a denial terminates the request before any handler work happens.

use salvo::Depot;
use salvo::http::StatusCode;

use geopub_service::authz::pg_authorizer;
use geopub_service::error::ServiceError;

use crate::config::get_config_from_depot;
use crate::db_handler::get_pool_from_depot;
use crate::error::{write_app_error, write_authz_error, write_error};
use crate::middleware::actor::get_actor_from_depot;
use crate::middleware::depot_keys;
use crate::middleware::publication_path::parse_publication_path;

pub struct AuthzMiddleware;

#[salvo::async_trait]
impl salvo::Handler for AuthzMiddleware {
    #[tracing::instrument(skip_all, fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        let path = req.uri().path().to_string();

        let Some(publication_path) = parse_publication_path(&path) else {
            // The router should never deliver such a path here; refuse to
            // guess rather than let it through unauthorized.
            tracing::error!(path = %path, "Unable to authorize request path");
            write_error(
                res,
                StatusCode::NOT_FOUND,
                25,
                "This endpoint and method are not implemented yet!",
                None,
            );
            ctrl.skip_rest();
            return;
        };

        let context = match (
            get_config_from_depot(depot),
            get_pool_from_depot(depot),
            get_actor_from_depot(depot),
        ) {
            (Ok(config), Ok(pool), Ok(actor)) => Some((config, pool, actor)),
            _ => None,
        };
        let Some((config, pool, actor)) = context else {
            tracing::error!("Authorization context missing from depot");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
            ctrl.skip_rest();
            return;
        };

        let authorizer = match pg_authorizer(pool.as_ref().clone(), &config) {
            Ok(authorizer) => authorizer,
            Err(e) => {
                write_app_error(res, &e.into());
                ctrl.skip_rest();
                return;
            }
        };

        let decision = authorizer
            .authorize(
                &publication_path.workspace,
                publication_path.publication_type,
                publication_path.name.as_deref(),
                req.method().as_str(),
                actor.name(),
            )
            .await;

        match decision {
            Ok(()) => {
                depot.insert(depot_keys::PUBLICATION_PATH, publication_path);
            }
            Err(ServiceError::Authz(denial)) => {
                write_authz_error(res, &denial);
                ctrl.skip_rest();
            }
            Err(e) => {
                write_app_error(res, &e.into());
                ctrl.skip_rest();
            }
        }
    }
}

/// ## Summary
/// Retrieves the parsed publication path from the depot.
///
/// ## Errors
/// Returns an error if the authorization middleware did not run.
pub fn get_publication_path_from_depot(
    depot: &Depot,
) -> crate::error::AppResult<super::publication_path::PublicationPath> {
    depot
        .get::<super::publication_path::PublicationPath>(depot_keys::PUBLICATION_PATH)
        .cloned()
        .map_err(|_e| {
            geopub_core::error::CoreError::InvariantViolation(
                "Publication path not found in depot",
            )
            .into()
        })
}
