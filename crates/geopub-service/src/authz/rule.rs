//! Access-rule membership evaluation.
//!
//! An access rule is a set of principal names attached to a publication
//! right or to a workspace-level policy. An actor satisfies a rule when the
//! rule is open to everyone, names the actor directly, or names a role the
//! actor holds.

use geopub_core::config::AccessControlConfig;
use geopub_core::constants::EVERYONE_ROLE;

use crate::error::ServiceResult;

use super::principal::split_principals;
use super::role::RoleService;
use super::store::RoleStore;

/// The configured workspace-level policy rules.
#[derive(Debug, Clone)]
pub struct GrantPolicy {
    create_public_workspace: Vec<String>,
    publish_in_public_workspace: Vec<String>,
}

impl GrantPolicy {
    #[must_use]
    pub fn from_config(config: &AccessControlConfig) -> Self {
        Self {
            create_public_workspace: config.grant_create_public_workspace.clone(),
            publish_in_public_workspace: config.grant_publish_in_public_workspace.clone(),
        }
    }
}

/// Evaluates actor membership in access rules.
pub struct RuleEvaluator<S> {
    roles: RoleService<S>,
    policy: GrantPolicy,
}

impl<S: RoleStore> RuleEvaluator<S> {
    pub const fn new(roles: RoleService<S>, policy: GrantPolicy) -> Self {
        Self { roles, policy }
    }

    pub const fn roles(&self) -> &RoleService<S> {
        &self.roles
    }

    /// ## Summary
    /// Tests whether the actor satisfies an access rule.
    ///
    /// True iff the rule contains `EVERYONE`, or names the actor as a user,
    /// or names a role the actor holds. Anonymous actors (`None`) hold no
    /// roles, so only an `EVERYONE` rule admits them.
    ///
    /// ## Errors
    /// Role-store failures propagate unchanged.
    pub async fn is_principal_in_rule<I, N>(
        &self,
        actor: Option<&str>,
        rule_principals: I,
    ) -> ServiceResult<bool>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let (user_names, role_names) = split_principals(rule_principals);

        if role_names.contains(EVERYONE_ROLE) {
            return Ok(true);
        }

        let Some(actor) = actor else {
            return Ok(false);
        };

        if user_names.contains(actor) {
            return Ok(true);
        }

        // Only now pay for the role lookup
        if role_names.is_empty() {
            return Ok(false);
        }
        let actor_roles = self.roles.get_roles(actor).await?;
        Ok(!actor_roles.is_disjoint(&role_names))
    }

    /// ## Summary
    /// Whether the actor may create a new public workspace.
    ///
    /// ## Errors
    /// Role-store failures propagate unchanged.
    pub async fn can_create_public_workspace(&self, actor: Option<&str>) -> ServiceResult<bool> {
        self.is_principal_in_rule(actor, &self.policy.create_public_workspace)
            .await
    }

    /// ## Summary
    /// Whether the actor may publish into an existing public workspace.
    ///
    /// ## Errors
    /// Role-store failures propagate unchanged.
    pub async fn can_publish_in_public_workspace(
        &self,
        actor: Option<&str>,
    ) -> ServiceResult<bool> {
        self.is_principal_in_rule(actor, &self.policy.publish_in_public_workspace)
            .await
    }
}
