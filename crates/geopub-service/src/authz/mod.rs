//! Publication access control.
//!
//! Every request that touches a workspace or a publication runs through this
//! module before any handler does real work. The decision combines
//! per-publication access rules (explicit usernames and role names, plus the
//! `EVERYONE` pseudo-role) with workspace-level policy for publishing into
//! public workspaces.
//!
//! ## Module Organization
//!
//! - `authorize`: the request-level decision tree (`Authorizer`)
//! - `error`: the denial taxonomy with stable numeric codes
//! - `filter`: read-filtering of multi-publication listings
//! - `pg`: Postgres-backed implementations of the store traits
//! - `principal`: username/role classification of principal names
//! - `rights`: access-rights records and partial-update completion
//! - `role`: role resolution with reserved-role filtering (`RoleService`)
//! - `rule`: access-rule membership evaluation (`RuleEvaluator`)
//! - `store`: traits for the stores the engine consults

pub mod authorize;
pub mod error;
pub mod filter;
pub mod pg;
pub mod principal;
pub mod rights;
pub mod role;
pub mod rule;
pub mod store;

// Re-export commonly used types at module level
pub use authorize::{Authorizer, check_workspace_name};
pub use error::AuthzError;
pub use filter::filter_publication_list;
pub use pg::{PgPublicationStore, PgRoleStore, PgWorkspaceStore, pg_authorizer};
pub use principal::{is_user_name, split_principals};
pub use rights::{AccessRights, PartialAccessRights, complete_access_rights};
pub use role::{RolePolicy, RoleService};
pub use rule::{GrantPolicy, RuleEvaluator};
pub use store::{PublicationInfo, PublicationStore, PublicationType, RoleStore, WorkspaceStore};
