//! Postgres-backed implementations of the store traits.
//!
//! Each adapter holds a pool handle and checks out a connection per query;
//! the engine itself never keeps a connection across a decision.

use geopub_core::config::Settings;
use geopub_core::constants::EVERYONE_ROLE;
use geopub_db::db::connection::{DbConnection, DbPool, get_connection};
use geopub_db::db::query::{publications, rights, roles, workspaces};
use geopub_db::model::publication::Publication;
use uuid::Uuid;

use crate::error::ServiceResult;

use super::authorize::Authorizer;
use super::rights::AccessRights;
use super::role::{RolePolicy, RoleService};
use super::rule::{GrantPolicy, RuleEvaluator};
use super::store::{PublicationInfo, PublicationStore, PublicationType, RoleStore, WorkspaceStore};

/// The authorizer wired to the Postgres stores.
pub type PgAuthorizer = Authorizer<PgWorkspaceStore, PgPublicationStore, PgRoleStore>;

/// ## Summary
/// Builds an `Authorizer` backed by the Postgres stores, with the rule
/// policy taken from configuration.
///
/// ## Errors
/// Returns `InvalidConfiguration` if the role-name pattern does not compile.
pub fn pg_authorizer(pool: DbPool, settings: &Settings) -> ServiceResult<PgAuthorizer> {
    let policy = RolePolicy::from_config(&settings.role_service)?;
    let role_service = RoleService::new(PgRoleStore::new(pool.clone()), policy);
    let evaluator = RuleEvaluator::new(
        role_service,
        GrantPolicy::from_config(&settings.access_control),
    );

    Ok(Authorizer::new(
        PgWorkspaceStore::new(pool.clone()),
        PgPublicationStore::new(pool),
        evaluator,
    ))
}

pub struct PgWorkspaceStore {
    pool: DbPool,
}

impl PgWorkspaceStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl WorkspaceStore for PgWorkspaceStore {
    async fn exists(&self, name: &str) -> ServiceResult<bool> {
        let mut conn = get_connection(&self.pool).await?;
        Ok(workspaces::exists(&mut conn, name).await?)
    }

    async fn is_personal(&self, name: &str) -> ServiceResult<bool> {
        let mut conn = get_connection(&self.pool).await?;
        Ok(workspaces::is_personal(&mut conn, name).await?)
    }
}

pub struct PgPublicationStore {
    pool: DbPool,
}

impl PgPublicationStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// ## Summary
    /// Loads all publications of one type in a workspace, with access
    /// rights assembled, for the list endpoints.
    ///
    /// ## Errors
    /// Store failures propagate unchanged.
    pub async fn list_infos(
        &self,
        workspace: &str,
        publication_type: PublicationType,
    ) -> ServiceResult<Vec<PublicationInfo>> {
        let mut conn = get_connection(&self.pool).await?;
        let rows =
            publications::list_by_workspace(&mut conn, workspace, publication_type.as_str())
                .await?;

        let mut infos = Vec::with_capacity(rows.len());
        for row in rows {
            infos.push(assemble_info(&mut conn, row, workspace.to_string()).await?);
        }
        Ok(infos)
    }
}

impl PublicationStore for PgPublicationStore {
    async fn get_info(
        &self,
        workspace: &str,
        publication_type: PublicationType,
        name: &str,
    ) -> ServiceResult<Option<PublicationInfo>> {
        let mut conn = get_connection(&self.pool).await?;
        let Some(row) =
            publications::get_by_name(&mut conn, workspace, publication_type.as_str(), name)
                .await?
        else {
            return Ok(None);
        };

        Ok(Some(
            assemble_info(&mut conn, row, workspace.to_string()).await?,
        ))
    }

    async fn get_info_by_uuid(&self, uuid: Uuid) -> ServiceResult<Option<PublicationInfo>> {
        let mut conn = get_connection(&self.pool).await?;
        let Some((row, workspace)) = publications::get_by_uuid(&mut conn, uuid).await? else {
            return Ok(None);
        };

        Ok(Some(assemble_info(&mut conn, row, workspace).await?))
    }
}

/// Joins the rights rows and the `EVERYONE` flags into the access-rights
/// record the engine evaluates.
async fn assemble_info(
    conn: &mut DbConnection<'_>,
    row: Publication,
    workspace: String,
) -> ServiceResult<PublicationInfo> {
    let mut read = rights::principals_for_publication(conn, row.id, rights::RIGHT_READ).await?;
    let mut write = rights::principals_for_publication(conn, row.id, rights::RIGHT_WRITE).await?;

    if row.everyone_can_read {
        read.insert(EVERYONE_ROLE.to_string());
    }
    if row.everyone_can_write {
        write.insert(EVERYONE_ROLE.to_string());
    }

    let publication_type: PublicationType = row.publication_type.parse()?;

    Ok(PublicationInfo {
        uuid: row.uuid,
        workspace,
        publication_type,
        name: row.name,
        title: row.title,
        access_rights: AccessRights { read, write },
    })
}

pub struct PgRoleStore {
    pool: DbPool,
}

impl PgRoleStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl RoleStore for PgRoleStore {
    async fn roles_for(&self, username: &str) -> ServiceResult<std::collections::HashSet<String>> {
        let mut conn = get_connection(&self.pool).await?;
        let names = roles::roles_for_user(&mut conn, username).await?;
        Ok(names.into_iter().collect())
    }

    async fn all_roles(&self) -> ServiceResult<Vec<String>> {
        let mut conn = get_connection(&self.pool).await?;
        Ok(roles::all_role_names(&mut conn).await?)
    }
}
