//! Role resolution with reserved-role filtering.
//!
//! The role-membership store returns raw role names; this module applies the
//! platform's filtering contract before any name reaches an authorization
//! decision or a discovery endpoint: system-reserved roles, auto-generated
//! per-user roles and names outside the allow-list pattern are never
//! surfaced.

use std::collections::HashSet;

use regex_lite::Regex;

use geopub_core::config::RoleServiceConfig;
use geopub_core::constants::{ADMIN_ROLE, EVERYONE_ROLE, GROUP_ADMIN_ROLE, USER_ROLE_PREFIX};

use crate::error::{ServiceError, ServiceResult};

use super::store::RoleStore;

/// Which role names may be surfaced at all.
#[derive(Debug, Clone)]
pub struct RolePolicy {
    internal_role: String,
    name_pattern: Regex,
}

impl RolePolicy {
    /// ## Summary
    /// Builds the policy from configuration, compiling the allow-list
    /// pattern.
    ///
    /// ## Errors
    /// Returns `InvalidConfiguration` if the pattern does not compile.
    pub fn from_config(config: &RoleServiceConfig) -> ServiceResult<Self> {
        let name_pattern = Regex::new(&config.name_pattern).map_err(|e| {
            ServiceError::InvalidConfiguration(format!(
                "role_service.name_pattern is not a valid pattern: {e}"
            ))
        })?;

        Ok(Self {
            internal_role: config.internal_role.clone(),
            name_pattern,
        })
    }

    /// Whether a stored role name may be surfaced.
    ///
    /// `EVERYONE` is a pseudo-role, never a stored membership, so it is
    /// rejected here and appended explicitly where discovery wants it.
    #[must_use]
    pub fn admits(&self, role: &str) -> bool {
        role != ADMIN_ROLE
            && role != GROUP_ADMIN_ROLE
            && role != self.internal_role
            && role != EVERYONE_ROLE
            && !role.starts_with(USER_ROLE_PREFIX)
            && self.name_pattern.is_match(role)
    }
}

/// Role lookups with the filtering contract applied.
pub struct RoleService<S> {
    store: S,
    policy: RolePolicy,
}

impl<S: RoleStore> RoleService<S> {
    pub const fn new(store: S, policy: RolePolicy) -> Self {
        Self { store, policy }
    }

    /// ## Summary
    /// Returns the grantable roles held by `username`; empty if the user has
    /// none or does not exist.
    ///
    /// ## Errors
    /// Store failures propagate unchanged; they are never swallowed into an
    /// empty set.
    pub async fn get_roles(&self, username: &str) -> ServiceResult<HashSet<String>> {
        let raw = self.store.roles_for(username).await?;
        let roles: HashSet<String> = raw
            .into_iter()
            .filter(|role| self.policy.admits(role))
            .collect();

        tracing::trace!(username, count = roles.len(), "Resolved user roles");
        Ok(roles)
    }

    /// ## Summary
    /// Returns all grantable role names with the `EVERYONE` pseudo-role
    /// appended at the end, for the role-discovery endpoint.
    ///
    /// ## Errors
    /// Store failures propagate unchanged.
    pub async fn get_all_roles(&self) -> ServiceResult<Vec<String>> {
        let mut roles: Vec<String> = self
            .store
            .all_roles()
            .await?
            .into_iter()
            .filter(|role| self.policy.admits(role))
            .collect();
        roles.push(EVERYONE_ROLE.to_string());
        Ok(roles)
    }
}
