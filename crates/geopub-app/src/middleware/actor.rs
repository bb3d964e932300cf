//! Actor extraction from proxy authentication headers.
//!
//! The platform sits behind an authenticating proxy; the proxy asserts the
//! username in a header and this middleware only translates it into the
//! actor the authorization engine reasons about. A missing header means an
//! anonymous request, which is a perfectly valid actor.

use salvo::Depot;
use salvo::http::StatusCode;

use geopub_core::util::naming::is_valid_workspace_name;

use crate::error::{AppResult, write_error};
use crate::middleware::depot_keys;

/// Header the authenticating proxy asserts the username in.
pub const ACTOR_HEADER: &str = "x-auth-user";

/// The principal a request is evaluated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestActor {
    User(String),
    Anonymous,
}

impl RequestActor {
    /// The actor's username, `None` for anonymous requests.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::User(name) => Some(name),
            Self::Anonymous => None,
        }
    }
}

/// ## Summary
/// Middleware storing the request actor in the depot.
///
/// ## Side Effects
/// Inserts a `RequestActor` under `depot_keys::REQUEST_ACTOR`.
///
/// ## Errors
/// Responds with 403 (code 44) when the asserted username is malformed;
/// usernames share the workspace naming rule.
pub struct ActorMiddleware;

#[salvo::async_trait]
impl salvo::Handler for ActorMiddleware {
    #[tracing::instrument(skip_all, fields(path = %req.uri().path()))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        let header = req
            .headers()
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match header {
            None => {
                depot.insert(depot_keys::REQUEST_ACTOR, RequestActor::Anonymous);
            }
            Some(name) if is_valid_workspace_name(name) => {
                tracing::debug!(actor = name, "Request actor asserted by proxy");
                depot.insert(
                    depot_keys::REQUEST_ACTOR,
                    RequestActor::User(name.to_string()),
                );
            }
            Some(name) => {
                tracing::warn!(header = name, "Malformed username in auth header");
                write_error(
                    res,
                    StatusCode::FORBIDDEN,
                    44,
                    "Unsuccessful HTTP Header authentication",
                    None,
                );
                ctrl.skip_rest();
            }
        }
    }
}

/// ## Summary
/// Retrieves the request actor from the depot.
///
/// ## Errors
/// Returns an error if the actor middleware did not run.
pub fn get_actor_from_depot(depot: &Depot) -> AppResult<RequestActor> {
    depot
        .get::<RequestActor>(depot_keys::REQUEST_ACTOR)
        .cloned()
        .map_err(|_e| {
            geopub_core::error::CoreError::InvariantViolation("Request actor not found in depot")
                .into()
        })
}
