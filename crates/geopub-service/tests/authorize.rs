//! Authorization decision-tree tests.
//!
//! Exercises the `Authorizer` against in-memory stores: workspace gates,
//! collection-level POST policy, read-denial disguised as not-found, and the
//! write/read denial asymmetry.

use std::collections::{HashMap, HashSet};

use geopub_core::config::{AccessControlConfig, RoleServiceConfig};
use geopub_core::constants::ROLE_NAME_PATTERN;
use geopub_service::authz::{
    AccessRights, Authorizer, AuthzError, PublicationInfo, PublicationStore, PublicationType,
    RolePolicy, RoleService, RoleStore, RuleEvaluator, WorkspaceStore,
};
use geopub_service::authz::rule::GrantPolicy;
use geopub_service::error::{ServiceError, ServiceResult};

struct MemWorkspaceStore {
    workspaces: HashSet<String>,
    users: HashSet<String>,
}

impl WorkspaceStore for MemWorkspaceStore {
    async fn exists(&self, name: &str) -> ServiceResult<bool> {
        Ok(self.workspaces.contains(name))
    }

    async fn is_personal(&self, name: &str) -> ServiceResult<bool> {
        Ok(self.users.contains(name))
    }
}

struct MemPublicationStore {
    items: Vec<PublicationInfo>,
}

impl PublicationStore for MemPublicationStore {
    async fn get_info(
        &self,
        workspace: &str,
        publication_type: PublicationType,
        name: &str,
    ) -> ServiceResult<Option<PublicationInfo>> {
        Ok(self
            .items
            .iter()
            .find(|i| {
                i.workspace == workspace
                    && i.publication_type == publication_type
                    && i.name == name
            })
            .cloned())
    }

    async fn get_info_by_uuid(&self, uuid: uuid::Uuid) -> ServiceResult<Option<PublicationInfo>> {
        Ok(self.items.iter().find(|i| i.uuid == uuid).cloned())
    }
}

struct MemRoleStore {
    by_user: HashMap<String, HashSet<String>>,
}

impl RoleStore for MemRoleStore {
    async fn roles_for(&self, username: &str) -> ServiceResult<HashSet<String>> {
        Ok(self.by_user.get(username).cloned().unwrap_or_default())
    }

    async fn all_roles(&self) -> ServiceResult<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Test fixture builder for an in-memory authorizer.
struct Fixture {
    workspaces: HashSet<String>,
    users: HashSet<String>,
    items: Vec<PublicationInfo>,
    roles: HashMap<String, HashSet<String>>,
    create_public_workspace: Vec<String>,
    publish_in_public_workspace: Vec<String>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            workspaces: HashSet::new(),
            users: HashSet::new(),
            items: Vec::new(),
            roles: HashMap::new(),
            create_public_workspace: vec!["EVERYONE".to_string()],
            publish_in_public_workspace: vec!["EVERYONE".to_string()],
        }
    }

    /// Registers a user together with their personal workspace.
    fn with_user(mut self, name: &str) -> Self {
        self.users.insert(name.to_string());
        self.workspaces.insert(name.to_string());
        self
    }

    fn with_workspace(mut self, name: &str) -> Self {
        self.workspaces.insert(name.to_string());
        self
    }

    fn with_roles(mut self, user: &str, roles: &[&str]) -> Self {
        self.roles.insert(
            user.to_string(),
            roles.iter().map(ToString::to_string).collect(),
        );
        self
    }

    fn with_publication(
        mut self,
        workspace: &str,
        publication_type: PublicationType,
        name: &str,
        read: &[&str],
        write: &[&str],
    ) -> Self {
        self.items.push(PublicationInfo {
            uuid: uuid::Uuid::new_v4(),
            workspace: workspace.to_string(),
            publication_type,
            name: name.to_string(),
            title: name.to_string(),
            access_rights: AccessRights {
                read: read.iter().map(ToString::to_string).collect(),
                write: write.iter().map(ToString::to_string).collect(),
            },
        });
        self
    }

    fn with_create_policy(mut self, rule: &[&str]) -> Self {
        self.create_public_workspace = rule.iter().map(ToString::to_string).collect();
        self
    }

    fn with_publish_policy(mut self, rule: &[&str]) -> Self {
        self.publish_in_public_workspace = rule.iter().map(ToString::to_string).collect();
        self
    }

    fn build(self) -> Authorizer<MemWorkspaceStore, MemPublicationStore, MemRoleStore> {
        let policy = RolePolicy::from_config(&RoleServiceConfig {
            internal_role: "GEOPUB".to_string(),
            name_pattern: ROLE_NAME_PATTERN.to_string(),
        })
        .expect("role policy");
        let evaluator = RuleEvaluator::new(
            RoleService::new(MemRoleStore { by_user: self.roles }, policy),
            GrantPolicy::from_config(&AccessControlConfig {
                grant_create_public_workspace: self.create_public_workspace,
                grant_publish_in_public_workspace: self.publish_in_public_workspace,
            }),
        );

        Authorizer::new(
            MemWorkspaceStore {
                workspaces: self.workspaces,
                users: self.users,
            },
            MemPublicationStore { items: self.items },
            evaluator,
        )
    }
}

fn denial(result: ServiceResult<()>) -> AuthzError {
    match result {
        Err(ServiceError::Authz(e)) => e,
        other => panic!("expected an authorization denial, got {other:?}"),
    }
}

// ============================================================================
// Workspace existence gate
// ============================================================================

#[test_log::test(tokio::test)]
async fn missing_workspace_is_not_found_for_any_single_publication_request() {
    let authz = Fixture::new().build();

    for method in ["GET", "PATCH", "PUT", "POST", "DELETE"] {
        for actor in [None, Some("alice")] {
            let err = denial(
                authz
                    .authorize("ghost", PublicationType::Layer, Some("l"), method, actor)
                    .await,
            );
            assert_eq!(err.code(), 40, "method {method}");
            assert!(matches!(err, AuthzError::WorkspaceNotFound { .. }));
        }
    }
}

#[test_log::test(tokio::test)]
async fn missing_workspace_is_not_found_for_collection_get_and_delete() {
    let authz = Fixture::new().build();

    for method in ["GET", "DELETE"] {
        let err = denial(
            authz
                .authorize("ghost", PublicationType::Map, None, method, Some("alice"))
                .await,
        );
        assert!(matches!(err, AuthzError::WorkspaceNotFound { .. }));
    }
}

// ============================================================================
// Collection-level branch
// ============================================================================

#[test_log::test(tokio::test)]
async fn anyone_may_list_an_existing_workspace() {
    let authz = Fixture::new().with_user("alice").build();

    for actor in [None, Some("alice"), Some("stranger")] {
        authz
            .authorize("alice", PublicationType::Layer, None, "GET", actor)
            .await
            .expect("collection GET should pass");
    }
}

#[test_log::test(tokio::test)]
async fn empty_publication_name_means_collection_request() {
    let authz = Fixture::new().with_user("alice").build();

    authz
        .authorize("alice", PublicationType::Layer, Some(""), "GET", None)
        .await
        .expect("empty name should be treated as a collection request");
}

#[test_log::test(tokio::test)]
async fn collection_rejects_unexpected_methods() {
    let authz = Fixture::new().with_user("alice").build();

    let err = denial(
        authz
            .authorize("alice", PublicationType::Layer, None, "PUT", Some("alice"))
            .await,
    );
    assert_eq!(
        err,
        AuthzError::UnsupportedMethod {
            method: "PUT".to_string()
        }
    );
    assert_eq!(err.code(), 31);
}

#[test_log::test(tokio::test)]
async fn method_matching_is_case_insensitive() {
    let authz = Fixture::new().with_user("alice").build();

    authz
        .authorize("alice", PublicationType::Layer, None, "get", None)
        .await
        .expect("lowercase method should be normalized");
}

#[test_log::test(tokio::test)]
async fn owner_may_publish_into_own_workspace_even_before_it_exists() {
    // Registered user, but the workspace row is only created on first publish
    let mut fixture = Fixture::new().with_user("alice");
    fixture.workspaces.remove("alice");
    let authz = fixture.build();

    authz
        .authorize("alice", PublicationType::Layer, None, "POST", Some("alice"))
        .await
        .expect("publishing into one's own workspace is always allowed");
}

#[test_log::test(tokio::test)]
async fn publishing_into_foreign_personal_workspace_is_unauthorized() {
    let authz = Fixture::new().with_user("alice").build();

    let err = denial(
        authz
            .authorize("alice", PublicationType::Layer, None, "POST", Some("bob"))
            .await,
    );
    assert_eq!(err, AuthzError::Unauthorized);
    assert_eq!(err.code(), 30);
}

#[test_log::test(tokio::test)]
async fn public_workspace_creation_requires_the_create_grant() {
    // Scenario: pub_ws does not exist; create restricted to ROLE_X,
    // publishing open to everyone; alice holds ROLE_X, bob does not.
    let fixture = || {
        Fixture::new()
            .with_create_policy(&["ROLE_X"])
            .with_publish_policy(&["EVERYONE"])
            .with_roles("alice", &["ROLE_X"])
    };

    fixture()
        .build()
        .authorize("pub_ws", PublicationType::Layer, None, "POST", Some("alice"))
        .await
        .expect("alice holds ROLE_X and may create pub_ws");

    let err = denial(
        fixture()
            .build()
            .authorize("pub_ws", PublicationType::Layer, None, "POST", Some("bob"))
            .await,
    );
    assert_eq!(err, AuthzError::Unauthorized);

    // Once the workspace exists, publishing no longer needs the create grant
    fixture()
        .with_workspace("pub_ws")
        .build()
        .authorize("pub_ws", PublicationType::Layer, None, "POST", None)
        .await
        .expect("anonymous may publish into the existing public workspace");
}

#[test_log::test(tokio::test)]
async fn creating_a_public_workspace_validates_the_name() {
    let authz = Fixture::new()
        .with_create_policy(&["EVERYONE"])
        .with_publish_policy(&["EVERYONE"])
        .build();

    let err = denial(
        authz
            .authorize("Bad-Name", PublicationType::Layer, None, "POST", Some("alice"))
            .await,
    );
    assert!(matches!(err, AuthzError::InvalidWorkspaceName { .. }));
    assert_eq!(err.code(), 2);
}

#[test_log::test(tokio::test)]
async fn publish_policy_gates_even_existing_public_workspaces() {
    let authz = Fixture::new()
        .with_workspace("pub_ws")
        .with_publish_policy(&["ROLE_Y"])
        .build();

    let err = denial(
        authz
            .authorize("pub_ws", PublicationType::Layer, None, "POST", Some("bob"))
            .await,
    );
    assert_eq!(err, AuthzError::Unauthorized);
}

// ============================================================================
// Single-publication branch
// ============================================================================

#[test_log::test(tokio::test)]
async fn read_denial_is_reported_as_not_found() {
    let authz = Fixture::new()
        .with_user("alice")
        .with_publication(
            "alice",
            PublicationType::Layer,
            "secret",
            &["alice"],
            &["alice"],
        )
        .build();

    let err = denial(
        authz
            .authorize(
                "alice",
                PublicationType::Layer,
                Some("secret"),
                "GET",
                Some("carol"),
            )
            .await,
    );
    // Not `Unauthorized`: carol must not learn that the layer exists
    assert_eq!(
        err,
        AuthzError::LayerNotFound {
            workspace: "alice".to_string(),
            name: "secret".to_string()
        }
    );
    assert_eq!(err.code(), 15);
}

#[test_log::test(tokio::test)]
async fn map_not_found_uses_the_map_code() {
    let authz = Fixture::new()
        .with_user("alice")
        .with_publication("alice", PublicationType::Map, "m", &["alice"], &["alice"])
        .build();

    let err = denial(
        authz
            .authorize("alice", PublicationType::Map, Some("m"), "GET", Some("carol"))
            .await,
    );
    assert_eq!(err.code(), 26);
    assert!(matches!(err, AuthzError::MapNotFound { .. }));
}

#[test_log::test(tokio::test)]
async fn write_denial_is_unauthorized_when_the_actor_can_read() {
    let authz = Fixture::new()
        .with_user("alice")
        .with_publication(
            "alice",
            PublicationType::Layer,
            "l",
            &["EVERYONE"],
            &["alice"],
        )
        .build();

    // Anonymous can read, so the denial may reveal existence
    let err = denial(
        authz
            .authorize("alice", PublicationType::Layer, Some("l"), "PATCH", None)
            .await,
    );
    assert_eq!(err, AuthzError::Unauthorized);

    // Same for a named actor outside the write rule
    let err = denial(
        authz
            .authorize(
                "alice",
                PublicationType::Layer,
                Some("l"),
                "DELETE",
                Some("bob"),
            )
            .await,
    );
    assert_eq!(err, AuthzError::Unauthorized);
}

#[test_log::test(tokio::test)]
async fn write_denial_is_not_found_when_the_actor_cannot_read() {
    let authz = Fixture::new()
        .with_user("alice")
        .with_publication("alice", PublicationType::Layer, "l", &["alice"], &["alice"])
        .build();

    let err = denial(
        authz
            .authorize(
                "alice",
                PublicationType::Layer,
                Some("l"),
                "PATCH",
                Some("bob"),
            )
            .await,
    );
    assert!(matches!(err, AuthzError::LayerNotFound { .. }));
}

#[test_log::test(tokio::test)]
async fn everyone_read_allows_anonymous_get() {
    let authz = Fixture::new()
        .with_user("alice")
        .with_publication(
            "alice",
            PublicationType::Layer,
            "l",
            &["EVERYONE"],
            &["alice"],
        )
        .build();

    authz
        .authorize("alice", PublicationType::Layer, Some("l"), "GET", None)
        .await
        .expect("EVERYONE read admits anonymous actors");
}

#[test_log::test(tokio::test)]
async fn role_grant_allows_write() {
    let authz = Fixture::new()
        .with_user("alice")
        .with_roles("bob", &["EDITORS"])
        .with_publication(
            "alice",
            PublicationType::Layer,
            "l",
            &["EVERYONE"],
            &["alice", "EDITORS"],
        )
        .build();

    authz
        .authorize(
            "alice",
            PublicationType::Layer,
            Some("l"),
            "PATCH",
            Some("bob"),
        )
        .await
        .expect("bob holds EDITORS which is in the write rule");
}

#[test_log::test(tokio::test)]
async fn owner_may_do_everything() {
    let authz = Fixture::new()
        .with_user("alice")
        .with_publication("alice", PublicationType::Layer, "l", &["alice"], &["alice"])
        .build();

    for method in ["GET", "PATCH", "PUT", "POST", "DELETE"] {
        authz
            .authorize(
                "alice",
                PublicationType::Layer,
                Some("l"),
                method,
                Some("alice"),
            )
            .await
            .unwrap_or_else(|e| panic!("owner should pass {method}: {e}"));
    }
}

#[test_log::test(tokio::test)]
async fn unknown_method_on_existing_publication_is_unsupported() {
    let authz = Fixture::new()
        .with_user("alice")
        .with_publication(
            "alice",
            PublicationType::Layer,
            "l",
            &["EVERYONE"],
            &["alice"],
        )
        .build();

    let err = denial(
        authz
            .authorize(
                "alice",
                PublicationType::Layer,
                Some("l"),
                "TRACE",
                Some("alice"),
            )
            .await,
    );
    assert_eq!(
        err,
        AuthzError::UnsupportedMethod {
            method: "TRACE".to_string()
        }
    );
}

#[test_log::test(tokio::test)]
async fn missing_publication_wins_over_unknown_method() {
    let authz = Fixture::new().with_user("alice").build();

    let err = denial(
        authz
            .authorize(
                "alice",
                PublicationType::Layer,
                Some("nope"),
                "TRACE",
                Some("alice"),
            )
            .await,
    );
    assert!(matches!(err, AuthzError::LayerNotFound { .. }));
}

// ============================================================================
// Store-touching helpers
// ============================================================================

#[test_log::test(tokio::test)]
async fn can_read_publication_is_false_for_missing_publications() {
    let authz = Fixture::new().with_user("alice").build();

    let can_read = authz
        .can_read_publication(Some("alice"), "alice", PublicationType::Layer, "nope")
        .await
        .expect("missing publication is not an error");
    assert!(!can_read);
}

#[test_log::test(tokio::test)]
async fn can_write_publication_by_uuid() {
    let fixture = Fixture::new().with_user("alice").with_publication(
        "alice",
        PublicationType::Map,
        "m",
        &["EVERYONE"],
        &["alice"],
    );
    let uuid = fixture.items[0].uuid;
    let authz = fixture.build();

    assert!(authz.can_write_publication(Some("alice"), uuid).await.unwrap());
    assert!(!authz.can_write_publication(Some("bob"), uuid).await.unwrap());
    assert!(!authz.can_write_publication(None, uuid).await.unwrap());
    assert!(
        !authz
            .can_write_publication(Some("alice"), uuid::Uuid::new_v4())
            .await
            .unwrap()
    );
}
