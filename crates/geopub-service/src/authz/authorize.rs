//! The request-level authorization decision tree.
//!
//! One entry point serves both collection-level requests ("all layers of
//! workspace X", no publication name) and single-publication requests. The
//! outcome is either `Ok(())` or one of the `AuthzError` denials; nothing is
//! cached between calls, so concurrent checks need no synchronization here.

use uuid::Uuid;

use geopub_core::util::naming::is_valid_workspace_name;

use crate::error::ServiceResult;

use super::error::AuthzError;
use super::rule::RuleEvaluator;
use super::store::{PublicationStore, PublicationType, RoleStore, WorkspaceStore};

/// ## Summary
/// Validates a proposed workspace name against the platform naming rule.
///
/// ## Errors
/// Returns `InvalidWorkspaceName` carrying the expected pattern.
pub fn check_workspace_name(workspace: &str) -> Result<(), AuthzError> {
    if is_valid_workspace_name(workspace) {
        Ok(())
    } else {
        Err(AuthzError::invalid_workspace_name(workspace))
    }
}

/// Decides, for one request, whether the actor may touch the addressed
/// workspace or publication.
pub struct Authorizer<W, P, S> {
    workspaces: W,
    publications: P,
    evaluator: RuleEvaluator<S>,
}

impl<W, P, S> Authorizer<W, P, S>
where
    W: WorkspaceStore,
    P: PublicationStore,
    S: RoleStore,
{
    pub const fn new(workspaces: W, publications: P, evaluator: RuleEvaluator<S>) -> Self {
        Self {
            workspaces,
            publications,
            evaluator,
        }
    }

    pub const fn evaluator(&self) -> &RuleEvaluator<S> {
        &self.evaluator
    }

    /// ## Summary
    /// Authorizes one request. An empty or missing `publication_name` marks
    /// a collection-level request.
    ///
    /// ## Errors
    /// Returns one of the `AuthzError` denials, or an infrastructure error
    /// when a backing store fails.
    pub async fn authorize(
        &self,
        workspace: &str,
        publication_type: PublicationType,
        publication_name: Option<&str>,
        method: &str,
        actor: Option<&str>,
    ) -> ServiceResult<()> {
        let method = method.to_ascii_uppercase();
        let name = publication_name.filter(|n| !n.is_empty());

        tracing::debug!(
            workspace,
            publication_type = %publication_type,
            name = ?name,
            method = %method,
            actor = ?actor,
            "Authorization check started"
        );

        let outcome = match name {
            None => self.authorize_collection(workspace, &method, actor).await,
            Some(name) => {
                self.authorize_publication(workspace, publication_type, name, &method, actor)
                    .await
            }
        };

        match &outcome {
            Ok(()) => tracing::debug!(workspace, name = ?name, "Authorization granted"),
            Err(e) => tracing::debug!(workspace, name = ?name, error = %e, "Authorization denied"),
        }
        outcome
    }

    /// Collection-level branch: list, bulk delete, or publish a new
    /// publication into the workspace.
    async fn authorize_collection(
        &self,
        workspace: &str,
        method: &str,
        actor: Option<&str>,
    ) -> ServiceResult<()> {
        match method {
            // Listing and bulk deletion only require the workspace to exist;
            // per-item read filtering and per-item write checks happen in the
            // handlers.
            "GET" | "DELETE" => {
                if self.workspaces.exists(workspace).await? {
                    Ok(())
                } else {
                    Err(AuthzError::WorkspaceNotFound {
                        workspace: workspace.to_string(),
                    }
                    .into())
                }
            }
            "POST" => self.authorize_publish(workspace, actor).await,
            other => Err(AuthzError::UnsupportedMethod {
                method: other.to_string(),
            }
            .into()),
        }
    }

    /// POST into a collection. The workspace-existence gate does not apply
    /// up front: this very request may be creating the workspace.
    async fn authorize_publish(&self, workspace: &str, actor: Option<&str>) -> ServiceResult<()> {
        // Publishing into one's own personal workspace
        if actor == Some(workspace) {
            return Ok(());
        }

        let is_personal = self.workspaces.is_personal(workspace).await?;
        if !is_personal
            && self
                .evaluator
                .can_publish_in_public_workspace(actor)
                .await?
        {
            if self.workspaces.exists(workspace).await? {
                return Ok(());
            }
            // The workspace would be created by this request
            if self.evaluator.can_create_public_workspace(actor).await? {
                check_workspace_name(workspace)?;
                return Ok(());
            }
        }

        Err(AuthzError::Unauthorized.into())
    }

    /// Single-publication branch.
    async fn authorize_publication(
        &self,
        workspace: &str,
        publication_type: PublicationType,
        name: &str,
        method: &str,
        actor: Option<&str>,
    ) -> ServiceResult<()> {
        if !self.workspaces.exists(workspace).await? {
            return Err(AuthzError::WorkspaceNotFound {
                workspace: workspace.to_string(),
            }
            .into());
        }

        let Some(info) = self
            .publications
            .get_info(workspace, publication_type, name)
            .await?
        else {
            return Err(AuthzError::publication_not_found(publication_type, workspace, name).into());
        };

        let can_read = self
            .evaluator
            .is_principal_in_rule(actor, &info.access_rights.read)
            .await?;

        match method {
            // Read-denial is reported as not-found so the publication's
            // existence stays hidden from actors without read access.
            "GET" => {
                if can_read {
                    Ok(())
                } else {
                    Err(
                        AuthzError::publication_not_found(publication_type, workspace, name)
                            .into(),
                    )
                }
            }
            "PATCH" | "PUT" | "POST" | "DELETE" => {
                if self
                    .evaluator
                    .is_principal_in_rule(actor, &info.access_rights.write)
                    .await?
                {
                    Ok(())
                } else if can_read {
                    // The actor already knows the publication exists
                    Err(AuthzError::Unauthorized.into())
                } else {
                    Err(
                        AuthzError::publication_not_found(publication_type, workspace, name)
                            .into(),
                    )
                }
            }
            other => Err(AuthzError::UnsupportedMethod {
                method: other.to_string(),
            }
            .into()),
        }
    }

    /// ## Summary
    /// Whether the actor may read the publication; `false` (not an error) if
    /// it does not exist.
    ///
    /// ## Errors
    /// Store failures propagate unchanged.
    pub async fn can_read_publication(
        &self,
        actor: Option<&str>,
        workspace: &str,
        publication_type: PublicationType,
        name: &str,
    ) -> ServiceResult<bool> {
        match self
            .publications
            .get_info(workspace, publication_type, name)
            .await?
        {
            Some(info) => {
                self.evaluator
                    .is_principal_in_rule(actor, &info.access_rights.read)
                    .await
            }
            None => Ok(false),
        }
    }

    /// ## Summary
    /// Whether the actor may write the publication addressed by UUID;
    /// `false` (not an error) if it does not exist.
    ///
    /// ## Errors
    /// Store failures propagate unchanged.
    pub async fn can_write_publication(
        &self,
        actor: Option<&str>,
        uuid: Uuid,
    ) -> ServiceResult<bool> {
        match self.publications.get_info_by_uuid(uuid).await? {
            Some(info) => {
                self.evaluator
                    .is_principal_in_rule(actor, &info.access_rights.write)
                    .await
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_name_check() {
        assert!(check_workspace_name("city_plans").is_ok());

        let err = check_workspace_name("City-Plans").unwrap_err();
        assert!(matches!(err, AuthzError::InvalidWorkspaceName { .. }));
        assert_eq!(err.code(), 2);
    }
}
