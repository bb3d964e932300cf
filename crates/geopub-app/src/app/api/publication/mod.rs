//! Workspace-publication REST handlers.
//!
//! Authorization has already happened in `AuthzMiddleware` by the time any
//! of these run; the handlers only do the store work the request asks for,
//! plus the per-item filtering and per-item write re-checks that
//! collection-level authorization deliberately leaves to them.

use std::collections::HashSet;
use std::sync::Arc;

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Request, Router, handler};
use serde::Deserialize;

use geopub_core::config::Settings;
use geopub_core::constants::{EVERYONE_ROLE, WORKSPACE_NAME_PATTERN, WORKSPACES_ROUTE_PREFIX};
use geopub_core::error::CoreError;
use geopub_core::util::naming::is_valid_workspace_name;
use geopub_db::db::connection::{DbPool, get_connection};
use geopub_db::db::query::{publications, rights, workspaces};
use geopub_db::error::DbError;
use geopub_db::model::publication::NewPublication;
use geopub_service::authz::{
    AccessRights, AuthzError, PartialAccessRights, PgPublicationStore, PgRoleStore,
    PublicationInfo, PublicationStore, PublicationType, RolePolicy, RoleService,
    complete_access_rights, filter_publication_list, pg_authorizer, split_principals,
};

use crate::config::get_config_from_depot;
use crate::db_handler::get_pool_from_depot;
use crate::error::{AppError, AppResult, write_app_error, write_error};
use crate::middleware::actor::{RequestActor, get_actor_from_depot};
use crate::middleware::authz::get_publication_path_from_depot;
use crate::middleware::publication_path::PublicationPath;

#[must_use]
pub fn routes() -> Router {
    Router::with_path("{workspace}/{publication_type}")
        .get(get_list)
        .post(post_list)
        .delete(delete_list)
        .push(
            Router::with_path("{name}")
                .get(get_one)
                .patch(patch_one)
                .delete(delete_one),
        )
}

/// Everything a publication handler needs from the depot.
struct RequestContext {
    config: Arc<Settings>,
    pool: Arc<DbPool>,
    actor: RequestActor,
    path: PublicationPath,
}

fn request_context(depot: &Depot) -> AppResult<RequestContext> {
    Ok(RequestContext {
        config: get_config_from_depot(depot)?,
        pool: get_pool_from_depot(depot)?,
        actor: get_actor_from_depot(depot)?,
        path: get_publication_path_from_depot(depot)?,
    })
}

impl RequestContext {
    fn publication_name(&self) -> AppResult<&str> {
        self.path
            .name
            .as_deref()
            .ok_or_else(|| CoreError::InvariantViolation("Missing publication name").into())
    }
}

/// Serializes a publication with deterministically ordered access rights.
fn publication_json(info: &PublicationInfo) -> serde_json::Value {
    let mut read: Vec<&str> = info.access_rights.read.iter().map(String::as_str).collect();
    read.sort_unstable();
    let mut write: Vec<&str> = info.access_rights.write.iter().map(String::as_str).collect();
    write.sort_unstable();

    serde_json::json!({
        "workspace": info.workspace,
        "name": info.name,
        "title": info.title,
        "uuid": info.uuid,
        "url": format!(
            "{WORKSPACES_ROUTE_PREFIX}/{}/{}/{}",
            info.workspace,
            info.publication_type.as_route_segment(),
            info.name
        ),
        "access_rights": { "read": read, "write": write },
    })
}

/// Splits one access rule into the shape the rights table stores.
fn grant_set(rule: &HashSet<String>) -> rights::GrantSet {
    let (users, roles) = split_principals(rule);
    let everyone = roles.contains(EVERYONE_ROLE);

    let mut users: Vec<String> = users.into_iter().collect();
    users.sort();
    let mut roles: Vec<String> = roles.into_iter().filter(|r| r != EVERYONE_ROLE).collect();
    roles.sort();

    rights::GrantSet {
        users,
        roles,
        everyone,
    }
}

/// ## Summary
/// Principal names in the completed rights that are neither registered
/// users nor known roles. `EVERYONE` is always known.
async fn unknown_principals(
    ctx: &RequestContext,
    completed: &AccessRights,
) -> AppResult<Vec<String>> {
    let all: HashSet<String> = completed
        .read
        .union(&completed.write)
        .cloned()
        .collect();
    let (user_names, role_names) = split_principals(&all);

    let mut conn = get_connection(&ctx.pool).await?;
    let candidates: Vec<String> = user_names.iter().cloned().collect();
    let known_users: HashSet<String> = workspaces::existing_user_names(&mut conn, &candidates)
        .await
        .map_err(DbError::from)?
        .into_iter()
        .collect();

    let policy = RolePolicy::from_config(&ctx.config.role_service).map_err(AppError::from)?;
    let role_service = RoleService::new(PgRoleStore::new(ctx.pool.as_ref().clone()), policy);
    let known_roles: HashSet<String> = role_service.get_all_roles().await?.into_iter().collect();

    let mut missing: Vec<String> = user_names
        .difference(&known_users)
        .cloned()
        .chain(role_names.iter().filter(|r| !known_roles.contains(*r)).cloned())
        .collect();
    missing.sort();
    Ok(missing)
}

fn write_wrong_access_rights(res: &mut salvo::Response, missing: &[String]) {
    write_error(
        res,
        StatusCode::BAD_REQUEST,
        43,
        "Wrong access rights",
        Some(serde_json::json!({ "unknown": missing })),
    );
}

// ============================================================================
// Collection endpoints
// ============================================================================

/// ## Summary
/// Lists the publications of the workspace the actor may read, in stored
/// order.
#[handler]
#[tracing::instrument(skip_all)]
async fn get_list(depot: &Depot, res: &mut salvo::Response) {
    match list_visible(depot).await {
        Ok(body) => res.render(Json(body)),
        Err(e) => write_app_error(res, &e),
    }
}

async fn list_visible(depot: &Depot) -> AppResult<serde_json::Value> {
    let ctx = request_context(depot)?;

    let store = PgPublicationStore::new(ctx.pool.as_ref().clone());
    let infos = store
        .list_infos(&ctx.path.workspace, ctx.path.publication_type)
        .await?;

    let authorizer = pg_authorizer(ctx.pool.as_ref().clone(), &ctx.config)?;
    let visible =
        filter_publication_list(authorizer.evaluator(), ctx.actor.name(), infos).await?;

    Ok(serde_json::Value::Array(
        visible.iter().map(publication_json).collect(),
    ))
}

#[derive(Debug, Deserialize)]
struct PublishRequest {
    name: String,
    title: Option<String>,
    access_rights: Option<PartialAccessRights>,
}

/// ## Summary
/// Creates a publication record, creating the workspace on first publish.
///
/// Access rights default to the publishing actor owning both rights
/// (`EVERYONE` for anonymous publishes into public workspaces); a partial
/// `access_rights` body replaces the defaulted keys verbatim.
#[handler]
#[tracing::instrument(skip_all)]
async fn post_list(req: &mut Request, depot: &Depot, res: &mut salvo::Response) {
    let body: PublishRequest = match req.parse_json().await {
        Ok(body) => body,
        Err(e) => {
            write_error(
                res,
                StatusCode::BAD_REQUEST,
                2,
                "Wrong parameter value",
                Some(serde_json::json!({ "parameter": "body", "reason": e.to_string() })),
            );
            return;
        }
    };

    if !is_valid_workspace_name(&body.name) {
        write_error(
            res,
            StatusCode::BAD_REQUEST,
            2,
            "Wrong parameter value",
            Some(serde_json::json!({
                "parameter": "name",
                "expected": WORKSPACE_NAME_PATTERN,
            })),
        );
        return;
    }

    let ctx = match request_context(depot) {
        Ok(ctx) => ctx,
        Err(e) => {
            write_app_error(res, &e);
            return;
        }
    };

    let owner = ctx.actor.name().unwrap_or(EVERYONE_ROLE);
    let completed =
        complete_access_rights(body.access_rights.as_ref(), &AccessRights::owned_by(owner));

    match unknown_principals(&ctx, &completed).await {
        Ok(missing) if !missing.is_empty() => {
            write_wrong_access_rights(res, &missing);
            return;
        }
        Ok(_) => {}
        Err(e) => {
            write_app_error(res, &e);
            return;
        }
    }

    match create_publication(&ctx, &body, &completed).await {
        Ok(created) => res.render(Json(created)),
        Err(AppError::DatabaseError(DbError::DatabaseError(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )))) => {
            let (code, message) = match ctx.path.publication_type {
                PublicationType::Layer => (17, "Layer already exists"),
                PublicationType::Map => (24, "Map already exists"),
            };
            write_error(res, StatusCode::CONFLICT, code, message, None);
        }
        Err(e) => write_app_error(res, &e),
    }
}

async fn create_publication(
    ctx: &RequestContext,
    body: &PublishRequest,
    completed: &AccessRights,
) -> AppResult<serde_json::Value> {
    let read = grant_set(&completed.read);
    let write = grant_set(&completed.write);

    let mut conn = get_connection(&ctx.pool).await?;
    let workspace = workspaces::ensure(&mut conn, &ctx.path.workspace)
        .await
        .map_err(DbError::from)?;

    let row = publications::insert(
        &mut conn,
        &NewPublication {
            uuid: uuid::Uuid::new_v4(),
            id_workspace: workspace.id,
            publication_type: ctx.path.publication_type.as_str(),
            name: &body.name,
            title: body.title.as_deref().unwrap_or(&body.name),
            everyone_can_read: read.everyone,
            everyone_can_write: write.everyone,
        },
    )
    .await
    .map_err(DbError::from)?;

    rights::replace_for_publication(&mut conn, row.id, &read, &write)
        .await
        .map_err(DbError::from)?;

    tracing::info!(
        workspace = %ctx.path.workspace,
        publication = %body.name,
        publication_type = %ctx.path.publication_type,
        "Publication created"
    );

    Ok(serde_json::json!([{
        "name": row.name,
        "uuid": row.uuid,
        "url": format!(
            "{WORKSPACES_ROUTE_PREFIX}/{}/{}/{}",
            ctx.path.workspace,
            ctx.path.publication_type.as_route_segment(),
            row.name
        ),
    }]))
}

/// ## Summary
/// Bulk delete: removes every publication in the collection the actor may
/// write. Collection-level authorization only checked workspace existence;
/// write access is re-verified here per item.
#[handler]
#[tracing::instrument(skip_all)]
async fn delete_list(depot: &Depot, res: &mut salvo::Response) {
    match delete_writable(depot).await {
        Ok(body) => res.render(Json(body)),
        Err(e) => write_app_error(res, &e),
    }
}

async fn delete_writable(depot: &Depot) -> AppResult<serde_json::Value> {
    let ctx = request_context(depot)?;

    let store = PgPublicationStore::new(ctx.pool.as_ref().clone());
    let infos = store
        .list_infos(&ctx.path.workspace, ctx.path.publication_type)
        .await?;

    let authorizer = pg_authorizer(ctx.pool.as_ref().clone(), &ctx.config)?;
    let mut deleted = Vec::new();

    for info in infos {
        if !authorizer
            .can_write_publication(ctx.actor.name(), info.uuid)
            .await?
        {
            continue;
        }

        let mut conn = get_connection(&ctx.pool).await?;
        let Some(row) = publications::get_by_name(
            &mut conn,
            &ctx.path.workspace,
            ctx.path.publication_type.as_str(),
            &info.name,
        )
        .await
        .map_err(DbError::from)?
        else {
            continue;
        };
        publications::delete_by_id(&mut conn, row.id)
            .await
            .map_err(DbError::from)?;

        tracing::info!(
            workspace = %ctx.path.workspace,
            publication = %info.name,
            "Publication deleted"
        );
        deleted.push(publication_json(&info));
    }

    Ok(serde_json::Value::Array(deleted))
}

// ============================================================================
// Single-publication endpoints
// ============================================================================

#[handler]
#[tracing::instrument(skip_all)]
async fn get_one(depot: &Depot, res: &mut salvo::Response) {
    match load_one(depot).await {
        Ok(body) => res.render(Json(body)),
        Err(e) => write_app_error(res, &e),
    }
}

async fn load_one(depot: &Depot) -> AppResult<serde_json::Value> {
    let ctx = request_context(depot)?;
    let name = ctx.publication_name()?;

    let store = PgPublicationStore::new(ctx.pool.as_ref().clone());
    let info = store
        .get_info(&ctx.path.workspace, ctx.path.publication_type, name)
        .await?
        .ok_or_else(|| not_found(&ctx, name))?;

    Ok(publication_json(&info))
}

fn not_found(ctx: &RequestContext, name: &str) -> AppError {
    geopub_service::error::ServiceError::from(AuthzError::publication_not_found(
        ctx.path.publication_type,
        &ctx.path.workspace,
        name,
    ))
    .into()
}

#[derive(Debug, Deserialize)]
struct PatchRequest {
    title: Option<String>,
    access_rights: Option<PartialAccessRights>,
}

/// ## Summary
/// Updates title and/or access rights. A partial `access_rights` body is
/// completed against the stored record: present keys replace, missing keys
/// keep the stored value.
#[handler]
#[tracing::instrument(skip_all)]
async fn patch_one(req: &mut Request, depot: &Depot, res: &mut salvo::Response) {
    let body: PatchRequest = match req.parse_json().await {
        Ok(body) => body,
        Err(e) => {
            write_error(
                res,
                StatusCode::BAD_REQUEST,
                2,
                "Wrong parameter value",
                Some(serde_json::json!({ "parameter": "body", "reason": e.to_string() })),
            );
            return;
        }
    };

    let ctx = match request_context(depot) {
        Ok(ctx) => ctx,
        Err(e) => {
            write_app_error(res, &e);
            return;
        }
    };

    match apply_patch(&ctx, &body, res).await {
        Ok(Some(body)) => res.render(Json(body)),
        Ok(None) => {} // response already written
        Err(e) => write_app_error(res, &e),
    }
}

async fn apply_patch(
    ctx: &RequestContext,
    body: &PatchRequest,
    res: &mut salvo::Response,
) -> AppResult<Option<serde_json::Value>> {
    let name = ctx.publication_name()?;

    let store = PgPublicationStore::new(ctx.pool.as_ref().clone());
    let existing = store
        .get_info(&ctx.path.workspace, ctx.path.publication_type, name)
        .await?
        .ok_or_else(|| not_found(ctx, name))?;

    let completed = complete_access_rights(body.access_rights.as_ref(), &existing.access_rights);

    let missing = unknown_principals(ctx, &completed).await?;
    if !missing.is_empty() {
        write_wrong_access_rights(res, &missing);
        return Ok(None);
    }

    let read = grant_set(&completed.read);
    let write = grant_set(&completed.write);

    let mut conn = get_connection(&ctx.pool).await?;
    let row = publications::get_by_name(
        &mut conn,
        &ctx.path.workspace,
        ctx.path.publication_type.as_str(),
        name,
    )
    .await
    .map_err(DbError::from)?
    .ok_or_else(|| not_found(ctx, name))?;

    if let Some(title) = &body.title {
        publications::update_title(&mut conn, row.id, title)
            .await
            .map_err(DbError::from)?;
    }

    rights::replace_for_publication(&mut conn, row.id, &read, &write)
        .await
        .map_err(DbError::from)?;

    tracing::info!(
        workspace = %ctx.path.workspace,
        publication = %name,
        "Publication updated"
    );

    let updated = store
        .get_info(&ctx.path.workspace, ctx.path.publication_type, name)
        .await?
        .ok_or_else(|| not_found(ctx, name))?;
    Ok(Some(publication_json(&updated)))
}

#[handler]
#[tracing::instrument(skip_all)]
async fn delete_one(depot: &Depot, res: &mut salvo::Response) {
    match remove_one(depot).await {
        Ok(body) => res.render(Json(body)),
        Err(e) => write_app_error(res, &e),
    }
}

async fn remove_one(depot: &Depot) -> AppResult<serde_json::Value> {
    let ctx = request_context(depot)?;
    let name = ctx.publication_name()?;

    let mut conn = get_connection(&ctx.pool).await?;
    let row = publications::get_by_name(
        &mut conn,
        &ctx.path.workspace,
        ctx.path.publication_type.as_str(),
        name,
    )
    .await
    .map_err(DbError::from)?
    .ok_or_else(|| not_found(&ctx, name))?;

    publications::delete_by_id(&mut conn, row.id)
        .await
        .map_err(DbError::from)?;

    tracing::info!(
        workspace = %ctx.path.workspace,
        publication = %name,
        "Publication deleted"
    );

    Ok(serde_json::json!({
        "name": row.name,
        "uuid": row.uuid,
    }))
}
